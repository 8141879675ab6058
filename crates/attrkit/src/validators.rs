//! Attribute validators.
//!
//! A validator is called with the instance being checked (or `None` while the
//! instance is still being constructed), the attribute descriptor and the
//! candidate value. It either accepts the value or returns a
//! [`ValidationError`] describing the broken constraint.
//!
//! Validators run automatically when an instance is constructed and on demand
//! through [`validate`](crate::validate), which re-checks fields that were
//! reassigned after construction.
//!
//! ```
//! use attrkit::{attr, validators::instance_of, ClassBuilder, Type};
//!
//! let point = ClassBuilder::new("Point")
//!     .attr("x", attr().validator(instance_of(Type::Int)))
//!     .build()
//!     .unwrap();
//!
//! assert!(point.call([1]).is_ok());
//! assert!(point.call(["1"]).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::attribute::Attribute;
use crate::instance::Instance;
use crate::types::{Interface, Type};
use crate::value::Value;

/// Accepts or rejects a field value.
pub trait Validator: fmt::Debug + fmt::Display + Send + Sync {
    fn check(
        &self,
        instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError>;
}

/// The constraint a rejected value failed to meet.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must be of this type or a subtype.
    Type(Type),
    /// Value must be an instance whose class provides this interface.
    Interface(Interface),
    /// Free-form constraint from a closure validator.
    Custom(String),
}

/// A value was rejected by an attribute's validator.
#[derive(Debug, Clone)]
pub struct ValidationError {
    attribute: Attribute,
    constraint: Constraint,
    value: Value,
}

impl ValidationError {
    pub fn new(attribute: &Attribute, constraint: Constraint, value: &Value) -> Self {
        Self {
            attribute: attribute.clone(),
            constraint,
            value: value.clone(),
        }
    }

    /// Descriptor of the offending field.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// The rejected value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.attribute.name();
        match &self.constraint {
            Constraint::Type(expected) => write!(
                f,
                "'{}' must be {} (got {} that is a {}).",
                name,
                expected,
                self.value,
                self.value.type_of()
            ),
            Constraint::Interface(interface) => write!(
                f,
                "'{}' must provide {} which {} doesn't.",
                name, interface, self.value
            ),
            Constraint::Custom(description) => write!(
                f,
                "'{}' must satisfy {} (got {}).",
                name, description, self.value
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Accepts values whose type is `ty` or a subtype of it.
#[derive(Debug, Clone)]
pub struct InstanceOf {
    ty: Type,
}

/// Validator accepting values of type `ty` (or a subtype).
pub fn instance_of(ty: impl Into<Type>) -> InstanceOf {
    InstanceOf { ty: ty.into() }
}

impl Validator for InstanceOf {
    fn check(
        &self,
        _instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError> {
        if value.type_of().is_subtype_of(&self.ty) {
            Ok(())
        } else {
            Err(ValidationError::new(
                attribute,
                Constraint::Type(self.ty.clone()),
                value,
            ))
        }
    }
}

impl fmt::Display for InstanceOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance_of validator for type {}>", self.ty)
    }
}

/// Accepts instances whose class provides an interface.
#[derive(Debug, Clone)]
pub struct Provides {
    interface: Interface,
}

/// Validator accepting instances whose class (or a base) declares `interface`.
pub fn provides(interface: Interface) -> Provides {
    Provides { interface }
}

impl Validator for Provides {
    fn check(
        &self,
        _instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError> {
        let provided = value
            .as_instance()
            .is_some_and(|i| i.class().provides(&self.interface));
        if provided {
            Ok(())
        } else {
            Err(ValidationError::new(
                attribute,
                Constraint::Interface(self.interface.clone()),
                value,
            ))
        }
    }
}

impl fmt::Display for Provides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<provides validator for interface {}>", self.interface)
    }
}

/// Runs a sequence of validators; the first rejection wins.
#[derive(Debug, Clone)]
pub struct AndAll {
    validators: Vec<Arc<dyn Validator>>,
}

/// Compose validators so that all of them must accept the value.
pub fn and_all<I>(validators: I) -> AndAll
where
    I: IntoIterator<Item = Arc<dyn Validator>>,
{
    AndAll {
        validators: validators.into_iter().collect(),
    }
}

impl Validator for AndAll {
    fn check(
        &self,
        instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|v| v.check(instance, attribute, value))
    }
}

impl fmt::Display for AndAll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<and_all validator for [")?;
        for (i, v) in self.validators.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]>")
    }
}

/// Accepts `None`, otherwise defers to the wrapped validator.
#[derive(Debug, Clone)]
pub struct Optional<V> {
    inner: V,
}

pub fn optional<V: Validator>(inner: V) -> Optional<V> {
    Optional { inner }
}

impl<V: Validator> Validator for Optional<V> {
    fn check(
        &self,
        instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError> {
        if value.is_none() {
            return Ok(());
        }
        self.inner.check(instance, attribute, value)
    }
}

impl<V: Validator> fmt::Display for Optional<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<optional validator for {} or None>", self.inner)
    }
}

type Predicate = Arc<dyn Fn(Option<&Instance>, &Value) -> bool + Send + Sync>;

/// Validator built from a predicate closure.
#[derive(Clone)]
pub struct FnValidator {
    description: String,
    predicate: Predicate,
}

/// Adapt a predicate into a validator. `description` names the constraint in
/// error messages, e.g. `"a positive number"`.
pub fn from_fn<F>(description: impl Into<String>, predicate: F) -> FnValidator
where
    F: Fn(Option<&Instance>, &Value) -> bool + Send + Sync + 'static,
{
    FnValidator {
        description: description.into(),
        predicate: Arc::new(predicate),
    }
}

impl Validator for FnValidator {
    fn check(
        &self,
        instance: Option<&Instance>,
        attribute: &Attribute,
        value: &Value,
    ) -> Result<(), ValidationError> {
        if (self.predicate)(instance, value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                attribute,
                Constraint::Custom(self.description.clone()),
                value,
            ))
        }
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<validator for {}>", self.description)
    }
}
