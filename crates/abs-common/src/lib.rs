//! Shared utilities for the survey harmonization crates.
//!
//! Survey responses arrive as integer codes, floats written by statistical
//! packages (`3.0`), or strings. These helpers turn Polars values into the
//! integer codes the harmonization layer works with.

pub mod polars;

pub use polars::{any_to_i64, column_codes, parse_i64};
