//! Attribute descriptors and their declaration builder.
//!
//! A class is declared as an ordered list of named [`AttributeBuilder`]s.
//! When the class is built each builder is turned into an immutable
//! [`Attribute`], the descriptor every generated behavior reads from.

use std::fmt;
use std::sync::Arc;

use crate::error::{AttrsError, Result};
use crate::validators::{self, Validator};
use crate::value::Value;

/// Wraps a zero-argument callable that produces a fresh default per instance.
///
/// Use a factory instead of a literal default for containers: a literal is
/// cloned into every instance, a factory is called for each one.
#[derive(Clone)]
pub struct Factory {
    make: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl Factory {
    pub fn new<F>(make: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            make: Arc::new(make),
        }
    }

    /// Produce a new value.
    pub fn call(&self) -> Value {
        (self.make)()
    }
}

impl PartialEq for Factory {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.make, &other.make)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory(<fn>)")
    }
}

/// What an omitted constructor argument resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// No default: the argument is mandatory.
    Nothing,
    /// A literal, cloned into each instance.
    Value(Value),
    /// Called once per constructed instance.
    Factory(Factory),
}

impl DefaultValue {
    pub fn is_nothing(&self) -> bool {
        matches!(self, DefaultValue::Nothing)
    }

    /// The value an omitted argument takes, or `None` when there is no default.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            DefaultValue::Nothing => None,
            DefaultValue::Value(v) => Some(v.clone()),
            DefaultValue::Factory(factory) => Some(factory.call()),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Nothing => write!(f, "NOTHING"),
            DefaultValue::Value(v) => write!(f, "{}", v),
            DefaultValue::Factory(_) => write!(f, "Factory(<fn>)"),
        }
    }
}

/// Read-only description of one declared attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    default: DefaultValue,
    validator: Option<Arc<dyn Validator>>,
    repr: bool,
    cmp: bool,
    hash: bool,
    init: bool,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the constructor argument: the attribute name with leading
    /// underscores stripped, so `_private` is passed as `private`.
    pub fn arg_name(&self) -> &str {
        let stripped = self.name.trim_start_matches('_');
        if stripped.is_empty() {
            &self.name
        } else {
            stripped
        }
    }

    pub fn default(&self) -> &DefaultValue {
        &self.default
    }

    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validator.as_ref()
    }

    /// Included in the generated representation.
    pub fn repr(&self) -> bool {
        self.repr
    }

    /// Included in equality and ordering.
    pub fn cmp(&self) -> bool {
        self.cmp
    }

    /// Included in the hash.
    pub fn hash(&self) -> bool {
        self.hash
    }

    /// Accepted as a constructor argument.
    pub fn init(&self) -> bool {
        self.init
    }

    /// Run this attribute's validator, if any, against `value`.
    pub(crate) fn check(
        &self,
        instance: Option<&crate::instance::Instance>,
        value: &Value,
    ) -> std::result::Result<(), validators::ValidationError> {
        match &self.validator {
            Some(validator) => validator.check(instance, self, value),
            None => Ok(()),
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        let same_validator = match (&self.validator, &other.validator) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.name == other.name
            && self.default == other.default
            && same_validator
            && self.repr == other.repr
            && self.cmp == other.cmp
            && self.hash == other.hash
            && self.init == other.init
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute(name={:?}, default={}, validator=", self.name, self.default)?;
        match &self.validator {
            Some(v) => write!(f, "{}", v)?,
            None => write!(f, "None")?,
        }
        write!(
            f,
            ", repr={}, cmp={}, hash={}, init={})",
            self.repr, self.cmp, self.hash, self.init
        )
    }
}

/// Declares one attribute. Created with [`attr`].
///
/// ```
/// use attrkit::{attr, validators, Type, Value};
///
/// let count = attr()
///     .default(0)
///     .validator(validators::instance_of(Type::Int));
/// let tags = attr().factory(|| Value::List(Vec::new())).no_hash();
/// ```
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    default: Option<Value>,
    factory: Option<Factory>,
    validators: Vec<Arc<dyn Validator>>,
    repr: bool,
    cmp: bool,
    hash: bool,
    init: bool,
}

/// Start declaring an attribute: mandatory, unvalidated, included everywhere.
pub fn attr() -> AttributeBuilder {
    AttributeBuilder::new()
}

impl AttributeBuilder {
    pub fn new() -> Self {
        Self {
            default: None,
            factory: None,
            validators: Vec::new(),
            repr: true,
            cmp: true,
            hash: true,
            init: true,
        }
    }

    /// Literal default for omitted constructor arguments.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Per-instance default. Cannot be combined with [`default`](Self::default).
    pub fn factory<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.factory = Some(Factory::new(make));
        self
    }

    /// Same as [`factory`](Self::factory), taking an existing [`Factory`].
    pub fn factory_from(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Add a validator. Repeated calls accumulate; validators run in the
    /// order they were added.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Add several validators at once.
    pub fn validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.validators.extend(validators);
        self
    }

    pub fn no_repr(mut self) -> Self {
        self.repr = false;
        self
    }

    pub fn no_cmp(mut self) -> Self {
        self.cmp = false;
        self
    }

    pub fn no_hash(mut self) -> Self {
        self.hash = false;
        self
    }

    pub fn no_init(mut self) -> Self {
        self.init = false;
        self
    }

    /// Turn the declaration into a descriptor named `name`.
    pub(crate) fn finish(self, name: &str) -> Result<Attribute> {
        let default = match (self.default, self.factory) {
            (Some(_), Some(_)) => return Err(AttrsError::ConflictingDefault(name.to_string())),
            (Some(value), None) => DefaultValue::Value(value),
            (None, Some(factory)) => DefaultValue::Factory(factory),
            (None, None) => DefaultValue::Nothing,
        };

        let mut checks = self.validators;
        let validator = match checks.len() {
            0 => None,
            1 => checks.pop(),
            _ => Some(Arc::new(validators::and_all(checks)) as Arc<dyn Validator>),
        };

        Ok(Attribute {
            name: name.to_string(),
            default,
            validator,
            repr: self.repr,
            cmp: self.cmp,
            hash: self.hash,
            init: self.init,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;
    use crate::validators::instance_of;

    #[test]
    fn plain_attribute_has_no_default_and_all_flags() {
        let a = attr().finish("x").unwrap();
        assert_eq!(a.name(), "x");
        assert!(a.default().is_nothing());
        assert!(a.validator().is_none());
        assert!(a.repr() && a.cmp() && a.hash() && a.init());
    }

    #[test]
    fn opt_outs_clear_flags() {
        let a = attr().no_repr().no_cmp().no_hash().no_init().finish("x").unwrap();
        assert!(!a.repr());
        assert!(!a.cmp());
        assert!(!a.hash());
        assert!(!a.init());
    }

    #[test]
    fn default_and_factory_conflict() {
        let err = attr()
            .default(1)
            .factory(|| Value::Int(2))
            .finish("x")
            .unwrap_err();
        assert!(matches!(err, AttrsError::ConflictingDefault(name) if name == "x"));
    }

    #[test]
    fn factory_is_called_on_every_resolve() {
        let a = attr().factory(|| Value::List(vec![])).finish("xs").unwrap();
        let mut first = a.default().resolve().unwrap();
        let second = a.default().resolve().unwrap();
        first.as_list_mut().unwrap().push(Value::Int(1));
        assert_eq!(second, Value::List(vec![]));
        assert_eq!(first.as_list().unwrap().len(), 1);
    }

    #[test]
    fn shared_factory_is_the_same_default() {
        let factory = Factory::new(|| Value::Int(7));
        let a = attr().factory_from(factory.clone()).finish("a").unwrap();
        let b = attr().factory_from(factory).finish("a").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.default().resolve(), Some(Value::Int(7)));
    }

    #[test]
    fn literal_default_resolves_to_clone() {
        let a = attr().default("hi").finish("s").unwrap();
        assert_eq!(a.default().resolve(), Some(Value::from("hi")));
    }

    #[test]
    fn several_validators_are_composed() {
        let a = attr()
            .validator(instance_of(Type::Int))
            .validator(instance_of(Type::Any))
            .finish("n")
            .unwrap();
        let rendered = a.validator().unwrap().to_string();
        assert!(rendered.starts_with("<and_all validator"));
        assert!(a.check(None, &Value::Int(1)).is_ok());
        assert!(a.check(None, &Value::from("1")).is_err());
    }

    #[test]
    fn arg_name_strips_leading_underscores() {
        assert_eq!(attr().finish("_private").unwrap().arg_name(), "private");
        assert_eq!(attr().finish("__x").unwrap().arg_name(), "x");
        assert_eq!(attr().finish("public").unwrap().arg_name(), "public");
        assert_eq!(attr().finish("_").unwrap().arg_name(), "_");
    }

    #[test]
    fn display_lists_every_setting() {
        let a = attr().default(3).no_hash().finish("x").unwrap();
        assert_eq!(
            a.to_string(),
            r#"Attribute(name="x", default=3, validator=None, repr=true, cmp=true, hash=false, init=true)"#
        );
    }

    #[test]
    fn attributes_compare_by_settings() {
        let a = attr().default(1).finish("x").unwrap();
        let b = attr().default(1).finish("x").unwrap();
        let c = attr().default(2).finish("x").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
