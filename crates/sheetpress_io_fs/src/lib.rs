//! `sheetpress_io_fs` v1:
//! Rust-side file persistence helpers.
//!
//! Layout:
//! - `persist` : atomic write/copy into a destination path
//! - `spec`    : persistence options
//! - `util`    : shared helper functions

pub mod persist;
pub mod spec;
mod util;

pub use persist::{copy_file_atomic, write_file_atomic};
pub use spec::SpecPersistOptions;
