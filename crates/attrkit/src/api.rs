//! # Helpers
//!
//! Free functions over built classes and their instances. They only read the
//! metadata a class carries; none of them change a class.
//!
//! - [`fields`] / [`has`]: introspection of a [`Type`]
//! - [`asdict`] / [`asdict_with`]: instance to [`Value::Map`]
//! - [`assoc`]: copy an instance with some fields replaced
//! - [`validate`]: re-run validators against current field values
//! - [`make_class`] / [`make_class_with`]: build a class without a builder chain

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::attribute::{attr, Attribute, AttributeBuilder};
use crate::class::{Class, ClassBuilder};
use crate::error::{AttrsError, Result};
use crate::instance::Instance;
use crate::options::{AsDictOptions, ClassOptions};
use crate::types::Type;
use crate::value::Value;

/// The attribute descriptors of a class type, in declaration order.
///
/// Fails with [`AttrsError::NotAnAttrsClass`] for every other type.
pub fn fields(ty: &Type) -> Result<&[Attribute]> {
    match ty {
        Type::Class(class) => Ok(class.fields()),
        other => Err(AttrsError::NotAnAttrsClass(other.to_string())),
    }
}

/// Whether `ty` is a built class.
pub fn has(ty: &Type) -> bool {
    matches!(ty, Type::Class(_))
}

/// Convert an instance into a map from attribute name to value.
///
/// Nested instances are converted too, including instances inside list and
/// map values. Everything else is copied as is.
pub fn asdict(instance: &Instance) -> Value {
    asdict_with(instance, &AsDictOptions::default())
}

/// [`asdict`] with control over recursion and which fields are kept.
pub fn asdict_with(instance: &Instance, options: &AsDictOptions) -> Value {
    let mut map = BTreeMap::new();
    for (attribute, value) in instance.iter() {
        if !options.keeps(attribute, value) {
            continue;
        }
        let converted = if options.recurses() {
            convert(value, options)
        } else {
            value.clone()
        };
        map.insert(attribute.name().to_string(), converted);
    }
    Value::Map(map)
}

fn convert(value: &Value, options: &AsDictOptions) -> Value {
    match value {
        Value::Instance(nested) => asdict_with(nested, options),
        Value::List(items) => Value::List(items.iter().map(|v| convert(v, options)).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), convert(v, options)))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}

/// Copy `instance`, replacing the named fields.
///
/// Every name must be an attribute of the instance's class. Validators of the
/// replaced fields run against the new values; the original is never touched.
/// The copy is a new instance with its own identity.
pub fn assoc<I, K, V>(instance: &Instance, overrides: I) -> Result<Instance>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let class = instance.class();
    let values = instance.iter().map(|(_, value)| value.clone()).collect();
    let mut copy = Instance::from_parts(class.clone(), values);
    let mut replaced = Vec::new();

    for (name, value) in overrides {
        let name = name.as_ref();
        let index = class
            .fields()
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| AttrsError::UnknownAttribute {
                class: class.name().to_string(),
                attribute: name.to_string(),
            })?;
        copy.values_mut()[index] = value.into();
        replaced.push(index);
    }

    for index in replaced {
        let attribute = &class.fields()[index];
        if let Some(value) = copy.get(attribute.name()) {
            attribute.check(Some(&copy), value)?;
        }
    }

    Ok(copy)
}

/// Re-run every validator of the instance's class against its current values.
///
/// Fields reassigned with [`Instance::set`] are not validated at assignment
/// time; this is how they are checked afterwards.
pub fn validate(instance: &Instance) -> Result<()> {
    trace!(class = %instance.class().name(), "validating instance");
    for (attribute, value) in instance.iter() {
        if let Err(err) = attribute.check(Some(instance), value) {
            debug!(class = %instance.class().name(), error = %err, "validation failed");
            return Err(err.into());
        }
    }
    Ok(())
}

/// Attribute declarations accepted by [`make_class`].
#[derive(Debug, Clone)]
pub enum ClassFields {
    /// Plain attributes: mandatory, unvalidated.
    Names(Vec<String>),
    /// Fully declared attributes, in order.
    Attributes(Vec<(String, AttributeBuilder)>),
}

impl From<Vec<String>> for ClassFields {
    fn from(names: Vec<String>) -> Self {
        ClassFields::Names(names)
    }
}

impl From<Vec<&str>> for ClassFields {
    fn from(names: Vec<&str>) -> Self {
        ClassFields::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ClassFields {
    fn from(names: &[&str]) -> Self {
        ClassFields::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClassFields {
    fn from(names: [&str; N]) -> Self {
        ClassFields::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<S: Into<String>> From<Vec<(S, AttributeBuilder)>> for ClassFields {
    fn from(attributes: Vec<(S, AttributeBuilder)>) -> Self {
        ClassFields::Attributes(
            attributes
                .into_iter()
                .map(|(name, builder)| (name.into(), builder))
                .collect(),
        )
    }
}

/// Build a class named `name` from a list of attribute names or declarations.
///
/// ```
/// use attrkit::make_class;
///
/// let x = make_class("X", ["a", "b"]).unwrap();
/// assert_eq!(x.call([1, 2]).unwrap().to_string(), "X(a=1, b=2)");
/// ```
pub fn make_class(name: &str, fields: impl Into<ClassFields>) -> Result<Class> {
    make_class_with(name, fields, ClassOptions::default())
}

/// [`make_class`] with explicit generation options.
pub fn make_class_with(
    name: &str,
    fields: impl Into<ClassFields>,
    options: ClassOptions,
) -> Result<Class> {
    let declared: Vec<(String, AttributeBuilder)> = match fields.into() {
        ClassFields::Names(names) => names.into_iter().map(|n| (n, attr())).collect(),
        ClassFields::Attributes(attributes) => attributes,
    };

    declared
        .into_iter()
        .fold(ClassBuilder::new(name).options(options), |builder, (n, a)| {
            builder.attr(n, a)
        })
        .build()
}
