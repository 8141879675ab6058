//! # Classes
//!
//! A [`Class`] is what a declaration turns into once it is built: a name, an
//! ordered list of [`Attribute`] descriptors, and the [`ClassOptions`] saying
//! which structural behaviors its instances get.
//!
//! ## Declaring
//!
//! ```
//! use attrkit::{attr, ClassBuilder, Value};
//!
//! let point = ClassBuilder::new("Point")
//!     .attr("x", attr())
//!     .attr("y", attr().default(0))
//!     .build()
//!     .unwrap();
//!
//! let p = point.call([3]).unwrap();
//! assert_eq!(p.to_string(), "Point(x=3, y=0)");
//! assert_eq!(p.get("y"), Some(&Value::Int(0)));
//! ```
//!
//! ## What `build()` checks
//!
//! - the class name is not empty
//! - no attribute is declared twice
//! - no attribute has both a default and a factory
//! - no mandatory constructor argument follows one with a default
//!
//! After `build()` the descriptor list never changes; `Class` is a cheap,
//! shareable handle to it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::attribute::{Attribute, AttributeBuilder};
use crate::error::{AttrsError, Result};
use crate::instance::Instance;
use crate::options::ClassOptions;
use crate::types::Interface;
use crate::value::Value;

/// A built class.
///
/// Two handles are the same class only if they come from the same `build()`
/// call; classes with equal names and attributes are still distinct types.
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

struct ClassInner {
    name: String,
    attributes: Vec<Attribute>,
    options: ClassOptions,
    interfaces: Vec<Interface>,
    base: Option<Class>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The attribute descriptors, in declaration order.
    pub fn fields(&self) -> &[Attribute] {
        &self.inner.attributes
    }

    /// Look up a descriptor by attribute name.
    pub fn field(&self, name: &str) -> Option<&Attribute> {
        self.inner.attributes.iter().find(|a| a.name() == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.inner.attributes.iter().position(|a| a.name() == name)
    }

    pub fn options(&self) -> ClassOptions {
        self.inner.options
    }

    pub fn base(&self) -> Option<&Class> {
        self.inner.base.as_ref()
    }

    /// Whether this class is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.base();
        }
        false
    }

    /// Whether this class or one of its bases declares `interface`.
    pub fn provides(&self, interface: &Interface) -> bool {
        self.inner.interfaces.contains(interface)
            || self.base().is_some_and(|base| base.provides(interface))
    }

    /// Construct an instance from positional arguments only.
    pub fn call<I, V>(&self, args: I) -> Result<Instance>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.instantiate(Args::positional(args))
    }

    /// Construct an instance with the generated initializer.
    ///
    /// Positional arguments fill init-enabled attributes in declaration order,
    /// keyword arguments match them by [`Attribute::arg_name`]. Omitted
    /// arguments take their default; validators then run over every
    /// init-enabled field. Nothing is returned unless every step succeeds.
    pub fn instantiate(&self, args: Args) -> Result<Instance> {
        trace!(
            class = %self.name(),
            positional = args.positional.len(),
            keyword = args.keyword.len(),
            "instantiating"
        );

        if !self.inner.options.init {
            return self.instantiate_without_init(args);
        }

        let attributes = &self.inner.attributes;
        let init_slots: Vec<usize> = attributes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.init())
            .map(|(i, _)| i)
            .collect();

        if args.positional.len() > init_slots.len() {
            return Err(AttrsError::TooManyArguments {
                class: self.name().to_string(),
                expected: init_slots.len(),
                given: args.positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; attributes.len()];
        for (slot, value) in init_slots.iter().zip(args.positional) {
            slots[*slot] = Some(value);
        }

        for (name, value) in args.keyword {
            let Some(slot) = init_slots
                .iter()
                .copied()
                .find(|&i| attributes[i].arg_name() == name)
            else {
                return Err(AttrsError::UnexpectedArgument {
                    class: self.name().to_string(),
                    argument: name,
                });
            };
            if slots[slot].is_some() {
                return Err(AttrsError::DuplicateArgument {
                    class: self.name().to_string(),
                    argument: name,
                });
            }
            slots[slot] = Some(value);
        }

        let mut values = Vec::with_capacity(attributes.len());
        for (attribute, slot) in attributes.iter().zip(slots) {
            let value = match slot.or_else(|| attribute.default().resolve()) {
                Some(value) => value,
                None if attribute.init() => {
                    return Err(AttrsError::MissingArgument {
                        class: self.name().to_string(),
                        argument: attribute.arg_name().to_string(),
                    })
                }
                None => Value::None,
            };
            values.push(value);
        }

        for (attribute, value) in attributes.iter().zip(&values) {
            if attribute.init() {
                attribute.check(None, value).map_err(|err| {
                    debug!(class = %self.name(), error = %err, "validation failed during construction");
                    err
                })?;
            }
        }

        Ok(Instance::from_parts(self.clone(), values))
    }

    fn instantiate_without_init(&self, args: Args) -> Result<Instance> {
        if let Some((name, _)) = args.keyword.first() {
            return Err(AttrsError::UnexpectedArgument {
                class: self.name().to_string(),
                argument: name.clone(),
            });
        }
        let given = args.positional.len();
        if given > 0 {
            return Err(AttrsError::TooManyArguments {
                class: self.name().to_string(),
                expected: 0,
                given,
            });
        }
        let values = self
            .inner
            .attributes
            .iter()
            .map(|a| a.default().resolve().unwrap_or(Value::None))
            .collect();
        Ok(Instance::from_parts(self.clone(), values))
    }

    /// Construct an instance from a field-name mapping, as produced by
    /// [`asdict`](crate::asdict).
    ///
    /// Keys are attribute names; each one is passed as the matching keyword
    /// argument. Keys for attributes that do not take part in the initializer
    /// are ignored. Nested maps are passed through as maps.
    pub fn from_map(&self, map: &Value) -> Result<Instance> {
        let Value::Map(entries) = map else {
            return Err(AttrsError::NotAMap {
                class: self.name().to_string(),
                found: map.type_of().to_string(),
            });
        };

        let mut args = Args::new();
        for (key, value) in entries {
            let attribute = self.field(key).ok_or_else(|| AttrsError::UnknownAttribute {
                class: self.name().to_string(),
                attribute: key.clone(),
            })?;
            if attribute.init() && self.inner.options.init {
                args = args.kwarg(attribute.arg_name(), value.clone());
            }
        }
        self.instantiate(args)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn order_key(&self) -> (&str, usize) {
        (self.name(), self.addr())
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.inner.name)
            .field(
                "attributes",
                &self.inner.attributes.iter().map(Attribute::name).collect::<Vec<_>>(),
            )
            .field("options", &self.inner.options)
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.inner.name)
    }
}

/// Arguments for [`Class::instantiate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// Declares a class. Attributes keep the order they are added in.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    attributes: Vec<(String, AttributeBuilder)>,
    options: ClassOptions,
    interfaces: Vec<Interface>,
    base: Option<Class>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            options: ClassOptions::default(),
            interfaces: Vec::new(),
            base: None,
        }
    }

    /// Declare an attribute.
    pub fn attr(mut self, name: impl Into<String>, attribute: AttributeBuilder) -> Self {
        self.attributes.push((name.into(), attribute));
        self
    }

    /// Replace all generation options at once.
    pub fn options(mut self, options: ClassOptions) -> Self {
        self.options = options;
        self
    }

    pub fn no_repr(mut self) -> Self {
        self.options.repr = false;
        self
    }

    pub fn no_cmp(mut self) -> Self {
        self.options.cmp = false;
        self
    }

    pub fn no_hash(mut self) -> Self {
        self.options.hash = false;
        self
    }

    pub fn no_init(mut self) -> Self {
        self.options.init = false;
        self
    }

    /// Declare that instances provide `interface`.
    pub fn implements(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Inherit attributes and interfaces from `base`.
    ///
    /// Base attributes come first. Redeclaring a base attribute replaces its
    /// descriptor but keeps its position.
    pub fn extends(mut self, base: &Class) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Validate the declaration and produce the class.
    pub fn build(self) -> Result<Class> {
        if self.name.trim().is_empty() {
            return Err(AttrsError::EmptyClassName);
        }

        let mut attributes: Vec<Attribute> = self
            .base
            .as_ref()
            .map(|base| base.fields().to_vec())
            .unwrap_or_default();
        let inherited = attributes.len();

        let mut declared: Vec<String> = Vec::with_capacity(self.attributes.len());
        for (name, builder) in self.attributes {
            if declared.contains(&name) {
                return Err(AttrsError::DuplicateAttribute {
                    class: self.name,
                    attribute: name,
                });
            }
            let attribute = builder.finish(&name)?;
            match attributes.iter().position(|a| a.name() == name) {
                Some(i) => attributes[i] = attribute,
                None => attributes.push(attribute),
            }
            declared.push(name);
        }

        // `_x` and `x` would both be passed as `x`.
        let init_attributes: Vec<&Attribute> = attributes.iter().filter(|a| a.init()).collect();
        for (i, attribute) in init_attributes.iter().enumerate() {
            if init_attributes[..i]
                .iter()
                .any(|earlier| earlier.arg_name() == attribute.arg_name())
            {
                return Err(AttrsError::DuplicateAttribute {
                    class: self.name,
                    attribute: attribute.arg_name().to_string(),
                });
            }
        }

        let mut had_default = false;
        for attribute in init_attributes {
            if attribute.default().is_nothing() {
                if had_default {
                    return Err(AttrsError::MandatoryAfterDefault {
                        class: self.name,
                        attribute: attribute.name().to_string(),
                    });
                }
            } else {
                had_default = true;
            }
        }

        debug!(
            class = %self.name,
            attributes = attributes.len(),
            inherited,
            "built attrs class"
        );

        Ok(Class {
            inner: Arc::new(ClassInner {
                name: self.name,
                attributes,
                options: self.options,
                interfaces: self.interfaces,
                base: self.base,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attr;
    use crate::types::Type;
    use crate::validators::instance_of;

    fn point() -> Class {
        ClassBuilder::new("Point")
            .attr("x", attr())
            .attr("y", attr())
            .build()
            .unwrap()
    }

    #[test]
    fn fields_keep_declaration_order() {
        let class = ClassBuilder::new("C")
            .attr("b", attr())
            .attr("a", attr())
            .attr("c", attr())
            .build()
            .unwrap();
        let names: Vec<_> = class.fields().iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = ClassBuilder::new("  ").build().unwrap_err();
        assert!(matches!(err, AttrsError::EmptyClassName));
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let err = ClassBuilder::new("C")
            .attr("x", attr())
            .attr("x", attr())
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrsError::DuplicateAttribute { attribute, .. } if attribute == "x"));
    }

    #[test]
    fn colliding_argument_names_are_rejected() {
        let err = ClassBuilder::new("C")
            .attr("_x", attr())
            .attr("x", attr())
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrsError::DuplicateAttribute { attribute, .. } if attribute == "x"));
    }

    #[test]
    fn conflicting_default_surfaces_at_build() {
        let err = ClassBuilder::new("C")
            .attr("x", attr().default(1).factory(|| Value::Int(1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrsError::ConflictingDefault(_)));
    }

    #[test]
    fn mandatory_after_default_is_rejected() {
        let err = ClassBuilder::new("C")
            .attr("x", attr().default(1))
            .attr("y", attr())
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrsError::MandatoryAfterDefault { attribute, .. } if attribute == "y"));
    }

    #[test]
    fn mandatory_after_default_ignores_non_init_attributes() {
        let class = ClassBuilder::new("C")
            .attr("x", attr().default(1))
            .attr("y", attr().no_init())
            .build();
        assert!(class.is_ok());
    }

    #[test]
    fn positional_and_keyword_arguments() {
        let p = point()
            .instantiate(Args::new().arg(1).kwarg("y", 2))
            .unwrap();
        assert_eq!(p.get("x"), Some(&Value::Int(1)));
        assert_eq!(p.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn missing_argument_is_reported() {
        let err = point().call([1]).unwrap_err();
        assert!(matches!(err, AttrsError::MissingArgument { argument, .. } if argument == "y"));
    }

    #[test]
    fn too_many_positional_arguments() {
        let err = point().call([1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            AttrsError::TooManyArguments { expected: 2, given: 3, .. }
        ));
    }

    #[test]
    fn unexpected_keyword_argument() {
        let err = point()
            .instantiate(Args::new().arg(1).arg(2).kwarg("z", 3))
            .unwrap_err();
        assert!(matches!(err, AttrsError::UnexpectedArgument { argument, .. } if argument == "z"));
    }

    #[test]
    fn argument_given_twice() {
        let err = point()
            .instantiate(Args::new().arg(1).kwarg("x", 2))
            .unwrap_err();
        assert!(matches!(err, AttrsError::DuplicateArgument { argument, .. } if argument == "x"));
    }

    #[test]
    fn private_attributes_take_stripped_keyword() {
        let class = ClassBuilder::new("C")
            .attr("_private", attr())
            .build()
            .unwrap();
        let c = class
            .instantiate(Args::new().kwarg("private", 42))
            .unwrap();
        assert_eq!(c.to_string(), "C(_private=42)");

        let err = class
            .instantiate(Args::new().kwarg("_private", 42))
            .unwrap_err();
        assert!(matches!(err, AttrsError::UnexpectedArgument { .. }));
    }

    #[test]
    fn validators_run_at_construction() {
        let class = ClassBuilder::new("C")
            .attr("x", attr().validator(instance_of(Type::Int)))
            .build()
            .unwrap();
        assert!(class.call([1]).is_ok());
        let err = class.call(["1"]).unwrap_err();
        match err {
            AttrsError::Validation(e) => assert_eq!(e.attribute().name(), "x"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validators_run_against_defaults() {
        let class = ClassBuilder::new("C")
            .attr("x", attr().default("nope").validator(instance_of(Type::Int)))
            .build()
            .unwrap();
        assert!(matches!(
            class.call(Vec::<Value>::new()),
            Err(AttrsError::Validation(_))
        ));
    }

    #[test]
    fn no_init_attribute_takes_default_or_none() {
        let class = ClassBuilder::new("C")
            .attr("x", attr())
            .attr("y", attr().no_init().default(5))
            .attr("z", attr().no_init())
            .build()
            .unwrap();
        let c = class.call([1]).unwrap();
        assert_eq!(c.get("y"), Some(&Value::Int(5)));
        assert_eq!(c.get("z"), Some(&Value::None));
        assert!(class.call([1, 2]).is_err());
    }

    #[test]
    fn class_without_init_accepts_no_arguments() {
        let class = ClassBuilder::new("C")
            .attr("x", attr().default(1))
            .attr("y", attr().validator(instance_of(Type::Int)))
            .no_init()
            .build()
            .unwrap();
        let c = class.call(Vec::<Value>::new()).unwrap();
        assert_eq!(c.get("x"), Some(&Value::Int(1)));
        assert_eq!(c.get("y"), Some(&Value::None));

        let err = class.call([1]).unwrap_err();
        assert!(matches!(err, AttrsError::TooManyArguments { expected: 0, .. }));

        let err = class.instantiate(Args::new().kwarg("x", 2)).unwrap_err();
        assert!(matches!(err, AttrsError::UnexpectedArgument { argument, .. } if argument == "x"));
    }

    #[test]
    fn subclass_inherits_attributes_first() {
        let base = ClassBuilder::new("Base")
            .attr("a", attr())
            .attr("b", attr())
            .build()
            .unwrap();
        let child = ClassBuilder::new("Child")
            .extends(&base)
            .attr("c", attr())
            .build()
            .unwrap();
        let names: Vec<_> = child.fields().iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(child.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&child));
        assert_eq!(child.base(), Some(&base));
    }

    #[test]
    fn subclass_can_override_base_attribute_in_place() {
        let base = ClassBuilder::new("Base")
            .attr("a", attr())
            .attr("b", attr())
            .build()
            .unwrap();
        let child = ClassBuilder::new("Child")
            .extends(&base)
            .attr("a", attr().no_repr())
            .build()
            .unwrap();
        assert_eq!(child.fields()[0].name(), "a");
        assert!(!child.fields()[0].repr());
        assert_eq!(child.fields().len(), 2);
    }

    #[test]
    fn interfaces_are_inherited() {
        let iface = Interface::new("IFoo");
        let base = ClassBuilder::new("Base")
            .implements(iface.clone())
            .build()
            .unwrap();
        let child = ClassBuilder::new("Child").extends(&base).build().unwrap();
        assert!(child.provides(&iface));
        assert!(!child.provides(&Interface::new("IBar")));
    }

    #[test]
    fn classes_are_identified_by_build() {
        let a = ClassBuilder::new("Same").build().unwrap();
        let b = ClassBuilder::new("Same").build().unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn from_map_rejects_non_maps_and_unknown_keys() {
        let err = point().from_map(&Value::Int(1)).unwrap_err();
        assert!(matches!(err, AttrsError::NotAMap { found, .. } if found == "int"));

        let mut map = std::collections::BTreeMap::new();
        map.insert("x".to_string(), Value::Int(1));
        map.insert("w".to_string(), Value::Int(1));
        let err = point().from_map(&Value::Map(map)).unwrap_err();
        assert!(matches!(err, AttrsError::UnknownAttribute { attribute, .. } if attribute == "w"));
    }
}
