//! # gp-basis
//!
//! Flavor-basis (PDG ids) and evolution-basis (singlet, valence, triplet
//! combinations) description plus the block filters built on top of it.
//!
//! ```
//! use gp_basis::{BasisTable, FlavorSelection, Projector};
//!
//! let table = BasisTable::standard().unwrap();
//! let selection = FlavorSelection::classify(&table, &["g"]).unwrap();
//! assert!(selection.mixes_flavors());
//! let _projector = Projector::new(&table);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod projector;
pub mod selection;
pub mod table;

pub use projector::Projector;
pub use selection::{CUSTOM_LABEL, FlavorSelection};
pub use table::{BasisTable, CUSTOM_DIRECTION, EVOLUTION_LABELS, FLAVOR_NAMES, FLAVOR_PIDS};
