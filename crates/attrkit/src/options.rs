//! # Generation Options
//!
//! Which structural behaviors a built class generates. Every option defaults
//! to `true`; switching one off mirrors an opt-out on the class declaration.
//!
//! Options are plain serde data so they can live in a configuration file:
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `repr` | `true` | Render instances as `Name(field=value, ...)` |
//! | `cmp` | `true` | Compare instances field-by-field (equality and ordering) |
//! | `hash` | `true` | Hash instances from their field values |
//! | `init` | `true` | Accept one constructor argument per attribute |
//!
//! Missing keys fall back to their defaults, so `{"hash": false}` is a
//! complete configuration.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::value::Value;

/// Structural behaviors generated for a class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct ClassOptions {
    pub repr: bool,
    pub cmp: bool,
    pub hash: bool,
    pub init: bool,
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self {
            repr: true,
            cmp: true,
            hash: true,
            init: true,
        }
    }
}

impl ClassOptions {
    /// Options with every generated behavior switched off.
    pub const fn none() -> Self {
        Self {
            repr: false,
            cmp: false,
            hash: false,
            init: false,
        }
    }
}

type FieldFilter = Arc<dyn Fn(&Attribute, &Value) -> bool + Send + Sync>;

/// Options for [`asdict_with`](crate::asdict_with).
#[derive(Clone)]
pub struct AsDictOptions {
    recurse: bool,
    filter: Option<FieldFilter>,
}

impl Default for AsDictOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            filter: None,
        }
    }
}

impl AsDictOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nested instances (and instances inside lists and maps) are
    /// converted too. When off, field values are copied as they are.
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Only keep fields for which `filter` returns `true`.
    ///
    /// The filter applies at every nesting level.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Attribute, &Value) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn recurses(&self) -> bool {
        self.recurse
    }

    pub(crate) fn keeps(&self, attribute: &Attribute, value: &Value) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter(attribute, value))
    }
}

impl fmt::Debug for AsDictOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsDictOptions")
            .field("recurse", &self.recurse)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
