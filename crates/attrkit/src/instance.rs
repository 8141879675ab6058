//! Instances of built classes and their generated structural behavior.
//!
//! | Behavior | Trait | Fields used |
//! |----------|-------|-------------|
//! | representation | `Display`, `Debug` | `repr` attributes |
//! | equality | `PartialEq`, `Eq` | `cmp` attributes |
//! | ordering | `PartialOrd` | `cmp` attributes |
//! | hashing | `Hash` | attributes with `hash` (and `cmp`, when comparison is generated) |
//!
//! Comparison only happens between instances of the same class. Instances of
//! different classes are never equal and have no order.
//!
//! Each construction gets an identity that clones share. Classes without
//! generated comparison fall back to it for equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{self, AtomicU64};

use crate::attribute::Attribute;
use crate::class::Class;
use crate::error::{AttrsError, Result};
use crate::value::Value;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(0);

/// One value per attribute of its class.
#[derive(Clone)]
pub struct Instance {
    class: Class,
    values: Vec<Value>,
    identity: u64,
}

impl Instance {
    /// A newly constructed instance with its own identity.
    pub(crate) fn from_parts(class: Class, values: Vec<Value>) -> Self {
        debug_assert_eq!(class.fields().len(), values.len());
        let identity = NEXT_IDENTITY.fetch_add(1, atomic::Ordering::Relaxed);
        Self {
            class,
            values,
            identity,
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    /// Current value of the named attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.class.field_index(name).map(|i| &self.values[i])
    }

    /// Mutable access to the named attribute's value.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.class.field_index(name).map(|i| &mut self.values[i])
    }

    /// Reassign an attribute.
    ///
    /// Validators are *not* run; call [`validate`](crate::validate) to re-check
    /// the instance afterwards.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .class
            .field_index(name)
            .ok_or_else(|| AttrsError::UnknownAttribute {
                class: self.class.name().to_string(),
                attribute: name.to_string(),
            })?;
        self.values[index] = value.into();
        Ok(())
    }

    /// Attribute descriptors paired with their current values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Value)> {
        self.class.fields().iter().zip(&self.values)
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Whether both handles come from the same construction.
    pub fn is_same(&self, other: &Self) -> bool {
        self.identity == other.identity
    }

    fn compared(&self) -> impl Iterator<Item = &Value> {
        self.iter().filter(|(a, _)| a.cmp()).map(|(_, v)| v)
    }

    /// Total order used when instances are nested inside a [`Value`].
    ///
    /// Agrees with `PartialOrd` wherever that is defined; otherwise orders by
    /// class name, then class identity, then instance identity.
    pub(crate) fn total_cmp(&self, other: &Self) -> Ordering {
        if let Some(ordering) = self.partial_cmp(other) {
            return ordering;
        }
        self.class
            .order_key()
            .cmp(&other.class.order_key())
            .then_with(|| self.identity.cmp(&other.identity))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        if self.class != other.class {
            return false;
        }
        if !self.class.options().cmp {
            return self.is_same(other);
        }
        self.compared().eq(other.compared())
    }
}

impl Eq for Instance {}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.class == other.class && self.is_same(other) {
            return Some(Ordering::Equal);
        }
        if self.class != other.class || !self.class.options().cmp {
            return None;
        }
        Some(self.compared().cmp(other.compared()))
    }
}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        let options = self.class.options();
        if !options.hash {
            return;
        }
        for (attribute, value) in self.iter() {
            if attribute.hash() && (attribute.cmp() || !options.cmp) {
                value.hash(state);
            }
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.class.options().repr {
            return write!(f, "<{} instance>", self.class.name());
        }
        write!(f, "{}(", self.class.name())?;
        let shown = self.iter().filter(|(a, _)| a.repr());
        for (i, (attribute, value)) in shown.enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", attribute.name(), value)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
