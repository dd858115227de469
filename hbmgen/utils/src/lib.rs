//! Shared utilities for the hbmgen generators.
mod errors;
mod out_file;

pub use errors::{Error, ErrorKind, GenResult};
pub use out_file::OutputFile;
