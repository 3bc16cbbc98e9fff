//! Loading suite declarations from disk.

mod suite_file;

pub use suite_file::{SuiteFile, SuiteFileError};
