//! # gp-generate
//!
//! Builds debug PDF sets: take a parent (nothing, the toy PDF, caller
//! functions or an installed set), keep only selected flavors or evolution
//! components, and write the result as an LHAPDF set.
//!
//! ```no_run
//! use gp_basis::BasisTable;
//! use gp_generate::{GenerateRequest, Generator, ParentSource};
//! use gp_lhagrid::Registry;
//!
//! let table = BasisTable::standard().unwrap();
//! let generator = Generator::new(&table, Registry::from_env(), ".");
//! let mut request = GenerateRequest::new("gluon_only");
//! request.parent = ParentSource::from_name(Some("CT14llo_NF3"));
//! generator.generate(&request, &["g"]).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod generator;
pub mod grid_spec;
pub mod source;
pub mod toy;

pub use generator::{GenerateRequest, GeneratedSet, Generator, template_info};
pub use grid_spec::{GridSpec, geomspace};
pub use source::{ParentSource, PdfFn};
pub use toy::ToyPdf;
