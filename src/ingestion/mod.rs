//! Loading exported tables into rows.
//!
//! Most callers should use [`read_table_from_path`] (from [`unified`]) which:
//!
//! - infers the format from the file extension (or you can force it via [`TableOptions`])
//! - reads the whole table into `Vec<Row>`, optionally keeping only a row range
//! - optionally reports the load (or its failure) to a [`crate::observability::CompileObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod unified;

pub use unified::{TableFormat, TableOptions, read_table_from_path};
