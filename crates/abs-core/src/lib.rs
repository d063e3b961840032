//! Study-level operations over harmonized survey waves.
//!
//! [`assemble`] stacks waves into one long table, [`ConceptAccessor`] reads
//! concepts by name instead of by question number, [`codebook`] documents
//! the registry, and [`harmonize_study`] runs the whole thing.

pub mod accessor;
pub mod assemble;
pub mod codebook;
pub mod error;
pub mod missingness;
pub mod pipeline;

pub use accessor::{ConceptAccessor, ConceptFetch, ConceptSeries, ConceptStatus};
pub use assemble::{
    Assembled, AssembledDataset, RESPONDENT_COLUMN, WAVE_COLUMN, assemble,
};
pub use codebook::{ABSENT_MARKER, CodebookRow, codebook, codebook_rows, render_codebook};
pub use error::{AssembleError, CoreError, Result};
pub use missingness::{WaveMissingness, missingness};
pub use pipeline::{StudyOutcome, harmonize_study};
