//! Runtime types and interfaces.

use std::fmt;

use crate::class::Class;

/// Runtime type of a [`Value`](crate::Value).
///
/// Used by the [`instance_of`](crate::validators::instance_of) validator and
/// by the introspection helpers, which accept any type and fail for the ones
/// that are not built classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Supertype of every other type.
    Any,
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Class(Class),
}

impl Type {
    /// Whether a value of type `self` is acceptable where `other` is expected.
    ///
    /// Every type is a subtype of itself and of [`Type::Any`]; a class is also
    /// a subtype of each of its bases. `Bool` is not a subtype of `Int`.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        match (self, other) {
            (_, Type::Any) => true,
            (Type::Class(sub), Type::Class(base)) => sub.is_subclass_of(base),
            (a, b) => a == b,
        }
    }

    /// The class, when this type is one.
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "any"),
            Type::None => write!(f, "none"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Str => write!(f, "str"),
            Type::List => write!(f, "list"),
            Type::Map => write!(f, "map"),
            Type::Class(class) => write!(f, "{}", class.name()),
        }
    }
}

impl From<Class> for Type {
    fn from(class: Class) -> Self {
        Type::Class(class)
    }
}

impl From<&Class> for Type {
    fn from(class: &Class) -> Self {
        Type::Class(class.clone())
    }
}

/// A named capability a class can declare support for.
///
/// Interfaces carry no methods; a class *provides* an interface when its
/// builder listed it with [`ClassBuilder::implements`](crate::ClassBuilder::implements)
/// or when one of its bases did.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interface {
    name: String,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;

    #[test]
    fn every_type_is_a_subtype_of_any() {
        for ty in [Type::None, Type::Bool, Type::Int, Type::Str, Type::Map] {
            assert!(ty.is_subtype_of(&Type::Any));
        }
    }

    #[test]
    fn primitives_only_match_themselves() {
        assert!(Type::Int.is_subtype_of(&Type::Int));
        assert!(!Type::Bool.is_subtype_of(&Type::Int));
        assert!(!Type::Int.is_subtype_of(&Type::Float));
        assert!(!Type::Any.is_subtype_of(&Type::Int));
    }

    #[test]
    fn subclasses_are_subtypes_of_their_bases() {
        let base = ClassBuilder::new("Base").build().unwrap();
        let child = ClassBuilder::new("Child").extends(&base).build().unwrap();
        let other = ClassBuilder::new("Base").build().unwrap();

        assert!(Type::from(&child).is_subtype_of(&Type::from(&base)));
        assert!(!Type::from(&base).is_subtype_of(&Type::from(&child)));
        // Same name, different class.
        assert!(!Type::from(&other).is_subtype_of(&Type::from(&base)));
    }

    #[test]
    fn display_uses_short_names() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Str.to_string(), "str");
        let class = ClassBuilder::new("Point").build().unwrap();
        assert_eq!(Type::from(class).to_string(), "Point");
    }
}
