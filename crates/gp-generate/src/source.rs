//! Where the unfiltered blocks of a new set come from.

use std::collections::BTreeMap;
use std::fmt;

use crate::toy::TOY_NAMES;

/// A caller-supplied `x f(x, Q²)` for one pid.
pub type PdfFn = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Parent of a generated set.
#[derive(Default)]
pub enum ParentSource {
    /// No parent: every flavor is `x (1 - x)`.
    #[default]
    Unset,
    /// The built-in ToyLH PDF.
    Toy,
    /// An installed set, looked up in the registry.
    Named(String),
    /// One function per pid; pids without a function are zero.
    Callables(BTreeMap<i32, PdfFn>),
}

impl ParentSource {
    /// Resolve a parent given by name, as on the command line.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None => Self::Unset,
            Some(n) if TOY_NAMES.contains(&n) => Self::Toy,
            Some(n) => Self::Named(n.to_string()),
        }
    }

    /// True if the blocks come from an installed set.
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Debug for ParentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Toy => f.write_str("Toy"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Callables(map) => {
                f.debug_tuple("Callables").field(&map.keys().collect::<Vec<_>>()).finish()
            }
        }
    }
}
