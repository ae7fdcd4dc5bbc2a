//! # gp-core
//!
//! Core types for genpdf: the discretized PDF grid block and the shared
//! error type used by every crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod grid;

pub use error::{Error, Result};
pub use grid::{Grid, Member};

/// genpdf version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
