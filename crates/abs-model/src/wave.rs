//! Survey wave enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One administration of the survey instrument.
///
/// Ordering follows fieldwork order, so `BTreeMap<Wave, _>` iterates
/// W2 < W3 < W4 < W5 < W6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Wave {
    #[serde(rename = "W2", alias = "w2")]
    W2,
    #[serde(rename = "W3", alias = "w3")]
    W3,
    #[serde(rename = "W4", alias = "w4")]
    W4,
    #[serde(rename = "W5", alias = "w5")]
    W5,
    #[serde(rename = "W6", alias = "w6")]
    W6,
}

impl Wave {
    /// All waves in canonical order.
    pub const ALL: [Wave; 5] = [Wave::W2, Wave::W3, Wave::W4, Wave::W5, Wave::W6];

    pub fn as_str(self) -> &'static str {
        match self {
            Wave::W2 => "W2",
            Wave::W3 => "W3",
            Wave::W4 => "W4",
            Wave::W5 => "W5",
            Wave::W6 => "W6",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Wave::W2 => 2,
            Wave::W3 => 3,
            Wave::W4 => 4,
            Wave::W5 => 5,
            Wave::W6 => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Wave> {
        Wave::ALL.into_iter().find(|wave| wave.number() == number)
    }

    /// Finds a wave token inside a free-form name such as a file stem.
    ///
    /// Accepts `W4`, `w4`, `wave4`, `wave_4` and `wave-4`, bounded by
    /// non-alphanumeric characters or the ends of the string.
    pub fn find_in(name: &str) -> Option<Wave> {
        let lower = name.to_ascii_lowercase();
        for token in lower.split(|ch: char| !ch.is_ascii_alphanumeric()) {
            if let Some(wave) = parse_token(token) {
                return Some(wave);
            }
        }
        // wave_4 / wave-4 split into "wave" and "4"
        let parts: Vec<&str> = lower
            .split(|ch: char| !ch.is_ascii_alphanumeric())
            .collect();
        parts
            .windows(2)
            .find(|pair| pair[0] == "wave")
            .and_then(|pair| pair[1].parse::<u8>().ok())
            .and_then(Wave::from_number)
    }
}

fn parse_token(token: &str) -> Option<Wave> {
    let digits = token
        .strip_prefix("wave")
        .or_else(|| token.strip_prefix('w'))?;
    digits.parse::<u8>().ok().and_then(Wave::from_number)
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Wave {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "W2" => Ok(Wave::W2),
            "W3" => Ok(Wave::W3),
            "W4" => Ok(Wave::W4),
            "W5" => Ok(Wave::W5),
            "W6" => Ok(Wave::W6),
            _ => Err(ModelError::UnknownWave(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive() {
        assert_eq!("w4".parse::<Wave>().unwrap(), Wave::W4);
        assert_eq!(" W6 ".parse::<Wave>().unwrap(), Wave::W6);
        assert!("W7".parse::<Wave>().is_err());
        assert!("W1".parse::<Wave>().is_err());
    }

    #[test]
    fn orders_by_fieldwork() {
        let mut waves = vec![Wave::W6, Wave::W2, Wave::W4];
        waves.sort();
        assert_eq!(waves, vec![Wave::W2, Wave::W4, Wave::W6]);
    }

    #[test]
    fn finds_wave_tokens_in_names() {
        assert_eq!(Wave::find_in("abs_w3_merged"), Some(Wave::W3));
        assert_eq!(Wave::find_in("W5"), Some(Wave::W5));
        assert_eq!(Wave::find_in("barometer-wave4"), Some(Wave::W4));
        assert_eq!(Wave::find_in("wave_6_core"), Some(Wave::W6));
        assert_eq!(Wave::find_in("w7"), None);
        assert_eq!(Wave::find_in("codebook"), None);
    }
}
