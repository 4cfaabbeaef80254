//! The three stage compilers.
//!
//! Each one is a pure function over an immutable table and its part of the configuration:
//!
//! - [`sectors`]: parameter rows -> sector tree
//! - [`results`]: result rows -> presentation blocks
//! - [`actions`]: action rows -> ranked action catalogue
//!
//! They share no state; [`crate::execution::ProjectCompiler`] runs them concurrently.

pub mod actions;
pub mod results;
pub mod sectors;
