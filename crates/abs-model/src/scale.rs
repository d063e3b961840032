//! Ordinal scale descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Number of ordinal levels on a response scale.
///
/// Only the widths the questionnaires actually use are representable, so a
/// reversal can never be asked for a width it does not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ScaleWidth {
    Four,
    Five,
    Six,
}

impl ScaleWidth {
    pub fn levels(self) -> i64 {
        match self {
            ScaleWidth::Four => 4,
            ScaleWidth::Five => 5,
            ScaleWidth::Six => 6,
        }
    }

    /// True when `value` is one of the scale's levels `1..=width`.
    pub fn contains(self, value: i64) -> bool {
        (1..=self.levels()).contains(&value)
    }
}

impl TryFrom<i64> for ScaleWidth {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(ScaleWidth::Four),
            5 => Ok(ScaleWidth::Five),
            6 => Ok(ScaleWidth::Six),
            other => Err(ModelError::UnsupportedWidth(other)),
        }
    }
}

impl From<ScaleWidth> for i64 {
    fn from(width: ScaleWidth) -> Self {
        width.levels()
    }
}

impl fmt::Display for ScaleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-point", self.levels())
    }
}

/// Polarity of a raw scale within one wave.
///
/// `Ascending` means raw `1` is the extreme-negative end, which matches the
/// canonical "higher = more positive" convention. `Descending` means raw `1`
/// is the extreme-positive end and the wave needs reversing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width and in-wave polarity of one question's scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleSpec {
    pub width: ScaleWidth,
    pub direction_in_wave: Direction,
}

impl ScaleSpec {
    pub fn new(width: ScaleWidth, direction_in_wave: Direction) -> Self {
        Self {
            width,
            direction_in_wave,
        }
    }

    pub fn needs_reversal(&self) -> bool {
        self.direction_in_wave == Direction::Descending
    }
}

impl fmt::Display for ScaleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.width, self.direction_in_wave)
    }
}

/// How a harmonization family detects absent responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicyKind {
    /// Sentinel codes such as 0, 97, 98, 99.
    #[default]
    Numeric,
    /// Codes whose value label reads like "Don't know" or "Refused".
    Label,
    /// Sentinel codes first, then label text on what remains.
    NumericThenLabel,
}

impl MissingPolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MissingPolicyKind::Numeric => "numeric",
            MissingPolicyKind::Label => "label",
            MissingPolicyKind::NumericThenLabel => "numeric_then_label",
        }
    }
}
