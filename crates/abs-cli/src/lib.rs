//! CLI library components for the survey harmonizer.

pub mod logging;
pub mod output;
pub mod registry;
