//! Core types and structures for lotto-forge

use serde::{Deserialize, Serialize};

use crate::error::{LottoForgeError, Result};

/// Smallest ball number
pub const MIN_NUMBER: u8 = 1;
/// Largest ball number
pub const MAX_NUMBER: u8 = 45;
/// Numbers per combination
pub const PICK_COUNT: usize = 6;

/// Default cap on samples spent per accepted combination
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// One ascending 6-tuple of distinct numbers from 1..=45
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Combination([u8; PICK_COUNT]);

impl Combination {
    /// Build from numbers that must already be strictly ascending
    pub fn new(numbers: [u8; PICK_COUNT]) -> Result<Self> {
        for &n in &numbers {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(crate::validation_error!(
                    "Number {} out of range ({}-{})",
                    n,
                    MIN_NUMBER,
                    MAX_NUMBER
                ));
            }
        }
        if numbers.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LottoForgeError::validation(format!(
                "Numbers must be distinct and ascending: {:?}",
                numbers
            )));
        }
        Ok(Self(numbers))
    }

    /// Build from numbers in any order
    pub fn from_unsorted(mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        numbers.sort_unstable();
        Self::new(numbers)
    }

    /// Caller guarantees six distinct in-range numbers
    pub(crate) fn from_distinct(mut numbers: [u8; PICK_COUNT]) -> Self {
        numbers.sort_unstable();
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }
}

impl TryFrom<Vec<u8>> for Combination {
    type Error = LottoForgeError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        let numbers: [u8; PICK_COUNT] = value.as_slice().try_into().map_err(|_| {
            LottoForgeError::validation(format!(
                "Expected {} numbers, got {}",
                PICK_COUNT,
                value.len()
            ))
        })?;
        Self::new(numbers)
    }
}

impl From<Combination> for Vec<u8> {
    fn from(combination: Combination) -> Self {
        combination.0.to_vec()
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join("  "))
    }
}

/// Ball color band, five contiguous ranges over 1..=45
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    Yellow,
    Blue,
    Red,
    Gray,
    Green,
}

impl ColorBand {
    pub const ALL: [ColorBand; 5] = [
        ColorBand::Yellow,
        ColorBand::Blue,
        ColorBand::Red,
        ColorBand::Gray,
        ColorBand::Green,
    ];

    /// Band for a number, `None` outside 1..=45
    pub fn of(number: u8) -> Option<Self> {
        match number {
            1..=10 => Some(ColorBand::Yellow),
            11..=20 => Some(ColorBand::Blue),
            21..=30 => Some(ColorBand::Red),
            31..=40 => Some(ColorBand::Gray),
            41..=45 => Some(ColorBand::Green),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorBand::Yellow => write!(f, "yellow"),
            ColorBand::Blue => write!(f, "blue"),
            ColorBand::Red => write!(f, "red"),
            ColorBand::Gray => write!(f, "gray"),
            ColorBand::Green => write!(f, "green"),
        }
    }
}

/// One historical draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub draw_no: u32,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: u8,
}

/// Configuration for combination generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Combinations per request
    pub count: usize,
    /// Samples allowed per accepted combination before giving up
    pub max_attempts: u64,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

/// JSON body for a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub lotto_numbers: Vec<Combination>,
}

/// JSON body for a frequency-derived pick; empty when the ranking is not ready
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPickResponse {
    pub numbers: Vec<u8>,
}

impl From<Option<Combination>> for TopPickResponse {
    fn from(pick: Option<Combination>) -> Self {
        Self {
            numbers: pick.map(Vec::from).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_validation() {
        assert!(Combination::new([1, 2, 3, 4, 5, 6]).is_ok());
        assert!(Combination::new([0, 2, 3, 4, 5, 6]).is_err());
        assert!(Combination::new([1, 2, 3, 4, 5, 46]).is_err());
        assert!(Combination::new([1, 1, 3, 4, 5, 6]).is_err());
        assert!(Combination::new([6, 5, 4, 3, 2, 1]).is_err());
    }

    #[test]
    fn test_from_unsorted() {
        let c = Combination::from_unsorted([38, 3, 30, 17, 10, 26]).unwrap();
        assert_eq!(c.numbers(), &[3, 10, 17, 26, 30, 38]);
        assert_eq!(c.sum(), 124);
        assert!(c.contains(17));
        assert!(!c.contains(18));
    }

    #[test]
    fn test_serde_shape() {
        let c = Combination::new([3, 10, 17, 26, 30, 38]).unwrap();
        let body = GenerationResponse { lotto_numbers: vec![c] };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"lotto_numbers":[[3,10,17,26,30,38]]}"#
        );

        let parsed: Combination = serde_json::from_str("[3,10,17,26,30,38]").unwrap();
        assert_eq!(parsed, c);
        assert!(serde_json::from_str::<Combination>("[3,3,17,26,30,38]").is_err());
        assert!(serde_json::from_str::<Combination>("[3,10,17]").is_err());
    }

    #[test]
    fn test_top_pick_response() {
        let empty: TopPickResponse = None.into();
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"numbers":[]}"#);

        let c = Combination::new([1, 2, 3, 4, 5, 6]).unwrap();
        let pick: TopPickResponse = Some(c).into();
        assert_eq!(pick.numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_color_band() {
        assert_eq!(ColorBand::of(1), Some(ColorBand::Yellow));
        assert_eq!(ColorBand::of(20), Some(ColorBand::Blue));
        assert_eq!(ColorBand::of(21), Some(ColorBand::Red));
        assert_eq!(ColorBand::of(40), Some(ColorBand::Gray));
        assert_eq!(ColorBand::of(45), Some(ColorBand::Green));
        assert_eq!(ColorBand::of(46), None);
        assert_eq!(ColorBand::Green.to_string(), "green");
    }
}
