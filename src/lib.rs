//! `sheet-compiler` turns spreadsheet exports (plain tables of cells) into a typed domain model:
//! a tree of sectors and parameters, a list of presentation blocks, and a ranked action catalogue.
//!
//! The primary entrypoint is [`execution::ProjectCompiler::compile`], which runs the three stage
//! compilers concurrently and hands the sector tree to a caller-supplied completion-rate
//! collaborator. Each stage compiler is also usable on its own under [`compile`].
//!
//! ## Inputs
//!
//! - Tables are `Vec<`[`types::Row`]`>`; load them with [`ingestion::read_table_from_path`]
//!   (`.csv`, `.json`, and workbooks with the Cargo feature `excel`) or build them in memory.
//! - Column layout and style catalogs come from a [`config::ProjectConfig`], usually decoded
//!   from JSON.
//!
//! ## Failure model
//!
//! Compiling never aborts on bad data:
//!
//! - a bad parameter field is recorded on the parameter (`error`) and the row is still built
//! - an unknown or malformed result block is skipped or degraded, and scanning continues
//! - an unusable parameter configuration yields an empty sector tree
//!
//! Each of these produces a [`diagnostics::Diagnostic`], returned beside the output and sent to
//! the configured [`observability::CompileObserver`].
//!
//! ## Quick example
//!
//! ```rust
//! use sheet_compiler::config::ProjectConfig;
//! use sheet_compiler::execution::{ExecutionOptions, ProjectCompiler};
//! use sheet_compiler::model::{Completion, Sector};
//! use sheet_compiler::types::text_row;
//!
//! # fn main() -> Result<(), sheet_compiler::CompileError> {
//! let config = ProjectConfig::from_json_str(
//!     r#"{"parameters": {"sectorColumns": [0], "fields": {"name": 1, "display": 2}}}"#,
//! )?;
//! let parameters = vec![text_row(&["Housing", "Surface", "1"])];
//! let results = vec![
//!     text_row(&["##Indicator"]),
//!     text_row(&["code", "co2"]),
//!     text_row(&["number", "42"]),
//! ];
//!
//! let compiler = ProjectCompiler::new(ExecutionOptions::default(), |_: &[Sector]| Completion::default());
//! let project = compiler.compile(&parameters, &[], &results, &config).value;
//! assert_eq!(project.sectors[0].name(), "Housing");
//! assert_eq!(project.results.len(), 1);
//! assert!(project.actions.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: cells and rows
//! - [`config`]: column layout and style catalogs
//! - [`model`]: compiled output types
//! - [`compile`]: the sector, result and action compilers
//! - [`execution`]: the project compiler, completion collaborator and metrics
//! - [`ingestion`]: table loading
//! - [`report`]: merging several projects' results into one report
//! - [`observability`], [`diagnostics`]: reporting hooks
//! - [`error`]: error types

pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod model;
pub mod observability;
pub mod report;
pub mod types;

pub use error::{CompileError, CompileResult};
