//! # gp-lhagrid
//!
//! Reader and writer for LHAPDF `lhagrid1` sets, plus the registry of
//! installed sets.
//!
//! ```no_run
//! use gp_lhagrid::{Registry, SetWriter};
//!
//! let registry = Registry::from_env();
//! let info = registry.load_info("CT14llo_NF3").unwrap();
//! let blocks = registry.load_blocks("CT14llo_NF3", 0).unwrap();
//! SetWriter::new(".").dump_set("copy", &info, &[blocks], None).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod export;
pub mod info;
pub mod member;
pub mod number;
pub mod registry;

pub use export::SetWriter;
pub use info::Info;
pub use member::{CENTRAL_HEADER, MemberFile, REPLICA_HEADER, parse_member, write_member};
pub use registry::{
    DATA_PATH_ENV, Registry, info_file_name, member_file_name, read_info, read_member,
};
