//! Harmonization transforms for one survey wave.
//!
//! - [`resolve_missing`] turns sentinel codes and "Don't know"-style labeled
//!   codes into absent values.
//! - [`reverse`] and [`reverse_column`] flip an ordinal scale of a given width.
//! - [`harmonize`] applies both to every family variable of a wave, driven by
//!   the registry's per-wave scale table, and adds concept-named columns.

pub mod codes;
pub mod error;
pub mod harmonize;
pub mod missing;
pub mod options;
pub mod reversal;

pub use codes::to_code_column;
pub use error::{Result, TransformError};
pub use harmonize::{HARMONIZED_MARKER, Harmonized, harmonize, is_harmonized_column};
pub use missing::{
    DEFAULT_MISSING_LABELS, DEFAULT_SENTINELS, MissingPolicy, Resolved, resolve_missing,
};
pub use options::HarmonizeOptions;
pub use reversal::{reverse, reverse_column};
