//! Fixed classification tables over 1..=45, stored as bitsets

use crate::types::{Combination, MAX_NUMBER};

/// Set of ball numbers packed into a `u64` (bit `n` set when `n` is a member)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSet(u64);

impl NumberSet {
    pub const fn of(numbers: &[u8]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < numbers.len() {
            bits |= 1u64 << numbers[i];
            i += 1;
        }
        Self(bits)
    }

    /// Every multiple of `step` in 1..=45
    pub const fn multiples_of(step: u8) -> Self {
        let mut bits = 0u64;
        let mut n = step;
        while n <= MAX_NUMBER {
            bits |= 1u64 << n;
            n += step;
        }
        Self(bits)
    }

    pub const fn contains(&self, number: u8) -> bool {
        number < 64 && self.0 & (1u64 << number) != 0
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// How many numbers of the combination fall in this set
    pub fn count_in(&self, combination: &Combination) -> usize {
        combination.iter().filter(|&n| self.contains(n)).count()
    }
}

pub const PRIMES: NumberSet = NumberSet::of(&[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43]);

pub const PERFECT_SQUARES: NumberSet = NumberSet::of(&[1, 4, 9, 16, 25, 36]);

pub const COMPOSITES: NumberSet = NumberSet::of(&[
    1, 4, 8, 10, 14, 16, 20, 22, 25, 26, 28, 32, 34, 35, 38, 40, 44,
]);

/// Numbers whose digits read as a swapped pair, plus the 6/9 flip
pub const MIRRORS: NumberSet = NumberSet::of(&[12, 21, 13, 31, 14, 41, 23, 32, 24, 42, 34, 43, 6, 9]);

/// 2x2 corner blocks of the 7-column play slip (rows 1-2 and 5-6)
pub const CORNERS: NumberSet = NumberSet::of(&[
    1, 2, 6, 7, 8, 9, 13, 14, 29, 30, 34, 35, 36, 37, 41, 42,
]);

pub const DOUBLES: NumberSet = NumberSet::of(&[11, 22, 33, 44]);

pub const MULTIPLES_OF_3: NumberSet = NumberSet::multiples_of(3);
pub const MULTIPLES_OF_4: NumberSet = NumberSet::multiples_of(4);
pub const MULTIPLES_OF_5: NumberSet = NumberSet::multiples_of(5);

/// Highest number counted as "low" in the high/low split
pub const LOW_MAX: u8 = 22;

/// Decade bucket (1-based): 1..=10 -> 1, ..., 41..=45 -> 5
pub const fn decade_bucket(number: u8) -> usize {
    ((number as usize - 1) / 10) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_match_slip_layout() {
        // seven numbers per row on the slip
        for n in 1..=45u8 {
            let row = (n - 1) / 7;
            let col = (n - 1) % 7;
            let corner = matches!(row, 0 | 1 | 4 | 5) && matches!(col, 0 | 1 | 5 | 6);
            assert_eq!(CORNERS.contains(n), corner, "number {}", n);
        }
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(PRIMES.len(), 14);
        assert_eq!(PERFECT_SQUARES.len(), 6);
        assert_eq!(COMPOSITES.len(), 17);
        assert_eq!(MIRRORS.len(), 14);
        assert_eq!(CORNERS.len(), 16);
        assert_eq!(DOUBLES.len(), 4);
        assert_eq!(MULTIPLES_OF_3.len(), 15);
        assert_eq!(MULTIPLES_OF_4.len(), 11);
        assert_eq!(MULTIPLES_OF_5.len(), 9);
    }

    #[test]
    fn test_membership() {
        assert!(PRIMES.contains(43));
        assert!(!PRIMES.contains(1));
        assert!(MULTIPLES_OF_3.contains(45));
        assert!(!MULTIPLES_OF_4.contains(46));
        assert!(!NumberSet::of(&[]).contains(63));
        assert!(NumberSet::of(&[]).is_empty());
    }

    #[test]
    fn test_decade_bucket() {
        assert_eq!(decade_bucket(1), 1);
        assert_eq!(decade_bucket(10), 1);
        assert_eq!(decade_bucket(11), 2);
        assert_eq!(decade_bucket(45), 5);
    }

    #[test]
    fn test_count_in() {
        let c = Combination::new([2, 3, 4, 9, 11, 44]).unwrap();
        assert_eq!(PRIMES.count_in(&c), 3);
        assert_eq!(PERFECT_SQUARES.count_in(&c), 2);
        assert_eq!(DOUBLES.count_in(&c), 2);
    }
}
