//! Acceptance rules applied to sampled combinations

use std::str::FromStr;

use super::tables::{
    decade_bucket, COMPOSITES, CORNERS, DOUBLES, LOW_MAX, MIRRORS, MULTIPLES_OF_3,
    MULTIPLES_OF_4, MULTIPLES_OF_5, PERFECT_SQUARES, PRIMES,
};
use crate::error::{LottoForgeError, Result};
use crate::types::{ColorBand, Combination, PICK_COUNT};

/// A pure, named acceptance test over a combination
pub trait Predicate: Send + Sync {
    /// Stable name used in logs, metrics and on the command line
    fn name(&self) -> &str;

    /// Whether the combination is acceptable
    fn test(&self, combination: &Combination) -> bool;
}

/// Built-in statistical filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Between 1 and 5 numbers at or below 22
    HighLow,
    /// Odd count of 0, 2, 3, 4 or 6
    OddEven,
    /// Sum outside 21..=80 and 181..=260
    SumRange,
    /// At most two last digits shared by exactly two numbers
    EndDigitPairs,
    /// No decade bucket holds four or more numbers
    DecadeBalance,
    /// At most one adjacent pair differing by one
    Consecutive,
    PrimeCount,
    SquareCount,
    CompositeCount,
    /// Sum of last digits within 14..=35
    EndDigitSum,
    NoMirror,
    MultipleOfThree,
    MultipleOfFour,
    MultipleOfFive,
    CornerCount,
    /// Three or four distinct color bands touched
    ColorBands,
    DoubleCount,
    /// At least seven distinct pairwise differences
    AcValue,
}

impl Rule {
    pub const ALL: [Rule; 18] = [
        Rule::HighLow,
        Rule::OddEven,
        Rule::SumRange,
        Rule::EndDigitPairs,
        Rule::DecadeBalance,
        Rule::Consecutive,
        Rule::PrimeCount,
        Rule::SquareCount,
        Rule::CompositeCount,
        Rule::EndDigitSum,
        Rule::NoMirror,
        Rule::MultipleOfThree,
        Rule::MultipleOfFour,
        Rule::MultipleOfFive,
        Rule::CornerCount,
        Rule::ColorBands,
        Rule::DoubleCount,
        Rule::AcValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::HighLow => "high-low",
            Rule::OddEven => "odd-even",
            Rule::SumRange => "sum-range",
            Rule::EndDigitPairs => "end-digit-pairs",
            Rule::DecadeBalance => "decade-balance",
            Rule::Consecutive => "consecutive",
            Rule::PrimeCount => "prime-count",
            Rule::SquareCount => "square-count",
            Rule::CompositeCount => "composite-count",
            Rule::EndDigitSum => "end-digit-sum",
            Rule::NoMirror => "no-mirror",
            Rule::MultipleOfThree => "multiple-of-3",
            Rule::MultipleOfFour => "multiple-of-4",
            Rule::MultipleOfFive => "multiple-of-5",
            Rule::CornerCount => "corner-count",
            Rule::ColorBands => "color-bands",
            Rule::DoubleCount => "double-count",
            Rule::AcValue => "ac-value",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::HighLow => "1-5 numbers at or below 22",
            Rule::OddEven => "odd:even split of 0:6, 2:4, 3:3, 4:2 or 6:0",
            Rule::SumRange => "sum outside 21-80 and 181-260",
            Rule::EndDigitPairs => "at most 2 last digits shared by exactly two numbers",
            Rule::DecadeBalance => "fewer than 4 numbers in any group of ten",
            Rule::Consecutive => "at most 1 consecutive pair",
            Rule::PrimeCount => "1-3 primes",
            Rule::SquareCount => "0-2 perfect squares",
            Rule::CompositeCount => "1-3 numbers from the composite table",
            Rule::EndDigitSum => "last digits sum to 14-35",
            Rule::NoMirror => "no mirror numbers (12/21, 13/31, ..., 6, 9)",
            Rule::MultipleOfThree => "1-3 multiples of 3",
            Rule::MultipleOfFour => "0-3 multiples of 4",
            Rule::MultipleOfFive => "0-2 multiples of 5",
            Rule::CornerCount => "1-3 corner numbers",
            Rule::ColorBands => "3-4 distinct ball colors",
            Rule::DoubleCount => "0-2 of 11, 22, 33, 44",
            Rule::AcValue => "at least 7 distinct pairwise differences",
        }
    }

    pub fn check(&self, combination: &Combination) -> bool {
        match self {
            Rule::HighLow => {
                let low = combination.iter().filter(|&n| n <= LOW_MAX).count();
                (1..=5).contains(&low)
            }
            Rule::OddEven => {
                let odd = combination.iter().filter(|&n| n % 2 != 0).count();
                matches!(odd, 0 | 2 | 3 | 4 | 6)
            }
            Rule::SumRange => {
                let sum = combination.sum();
                !((21..=80).contains(&sum) || (181..=260).contains(&sum))
            }
            Rule::EndDigitPairs => {
                let mut digits = [0u8; 10];
                for n in combination.iter() {
                    digits[(n % 10) as usize] += 1;
                }
                digits.iter().filter(|&&c| c == 2).count() <= 2
            }
            Rule::DecadeBalance => {
                let mut buckets = [0u8; 6];
                for n in combination.iter() {
                    buckets[decade_bucket(n)] += 1;
                }
                buckets.iter().all(|&c| c < 4)
            }
            Rule::Consecutive => consecutive_pairs(combination) <= 1,
            Rule::PrimeCount => (1..=3).contains(&PRIMES.count_in(combination)),
            Rule::SquareCount => PERFECT_SQUARES.count_in(combination) <= 2,
            Rule::CompositeCount => (1..=3).contains(&COMPOSITES.count_in(combination)),
            Rule::EndDigitSum => {
                let sum: u32 = combination.iter().map(|n| (n % 10) as u32).sum();
                (14..=35).contains(&sum)
            }
            Rule::NoMirror => MIRRORS.count_in(combination) == 0,
            Rule::MultipleOfThree => (1..=3).contains(&MULTIPLES_OF_3.count_in(combination)),
            Rule::MultipleOfFour => MULTIPLES_OF_4.count_in(combination) <= 3,
            Rule::MultipleOfFive => MULTIPLES_OF_5.count_in(combination) <= 2,
            Rule::CornerCount => (1..=3).contains(&CORNERS.count_in(combination)),
            Rule::ColorBands => (3..=4).contains(&color_band_count(combination)),
            Rule::DoubleCount => DOUBLES.count_in(combination) <= 2,
            Rule::AcValue => ac_value(combination) >= 7,
        }
    }
}

impl Predicate for Rule {
    fn name(&self) -> &str {
        Rule::name(self)
    }

    fn test(&self, combination: &Combination) -> bool {
        self.check(combination)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rule {
    type Err = LottoForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Rule::ALL
            .iter()
            .copied()
            .find(|rule| rule.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Rule::ALL.iter().map(|r| r.name()).collect();
                LottoForgeError::validation(format!(
                    "Unknown predicate '{}'. Known predicates: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Closure-backed predicate for rules outside the built-in catalog
pub struct FnPredicate<F> {
    name: String,
    check: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&Combination) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Combination) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, combination: &Combination) -> bool {
        (self.check)(combination)
    }
}

/// Count of adjacent pairs differing by exactly one
pub fn consecutive_pairs(combination: &Combination) -> usize {
    combination
        .numbers()
        .windows(2)
        .filter(|w| w[1] - w[0] == 1)
        .count()
}

/// Number of distinct color bands the combination touches
pub fn color_band_count(combination: &Combination) -> usize {
    let mut seen = [false; 5];
    for band in combination.iter().filter_map(ColorBand::of) {
        seen[band.index()] = true;
    }
    seen.iter().filter(|&&s| s).count()
}

/// Distinct absolute differences over all pairs
pub fn ac_value(combination: &Combination) -> usize {
    let numbers = combination.numbers();
    // differences are at most 44, one bit each
    let mut seen = 0u64;
    for i in 0..PICK_COUNT {
        for j in (i + 1)..PICK_COUNT {
            seen |= 1 << (numbers[j] - numbers[i]);
        }
    }
    seen.count_ones() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(numbers: [u8; 6]) -> Combination {
        Combination::from_unsorted(numbers).unwrap()
    }

    #[test]
    fn test_balanced_combination_passes_every_rule() {
        let combo = c([3, 10, 17, 26, 30, 38]);
        for rule in Rule::ALL {
            assert!(rule.check(&combo), "{} rejected {}", rule, combo);
        }
    }

    #[test]
    fn test_high_low() {
        assert!(!Rule::HighLow.check(&c([1, 2, 3, 4, 5, 6])));
        assert!(!Rule::HighLow.check(&c([23, 24, 25, 26, 27, 28])));
        assert!(Rule::HighLow.check(&c([22, 24, 25, 26, 27, 28])));
        assert!(Rule::HighLow.check(&c([1, 2, 3, 4, 5, 23])));
    }

    #[test]
    fn test_odd_even() {
        assert!(Rule::OddEven.check(&c([2, 4, 6, 8, 10, 12])));
        assert!(!Rule::OddEven.check(&c([1, 2, 4, 6, 8, 10])));
        assert!(!Rule::OddEven.check(&c([1, 3, 5, 7, 9, 10])));
        assert!(Rule::OddEven.check(&c([1, 3, 5, 7, 9, 11])));
        assert!(Rule::OddEven.check(&c([1, 3, 4, 6, 8, 10])));
    }

    #[test]
    fn test_sum_range() {
        assert!(!Rule::SumRange.check(&c([1, 2, 3, 4, 5, 6])));
        assert!(!Rule::SumRange.check(&c([10, 11, 12, 13, 14, 20])));
        assert!(Rule::SumRange.check(&c([10, 11, 12, 13, 14, 21])));
        assert!(!Rule::SumRange.check(&c([40, 41, 42, 43, 44, 45])));
    }

    #[test]
    fn test_end_digit_pairs() {
        assert!(!Rule::EndDigitPairs.check(&c([1, 11, 2, 12, 3, 13])));
        assert!(Rule::EndDigitPairs.check(&c([1, 11, 2, 12, 3, 14])));
        // a digit shared by three numbers is not a pair
        assert!(Rule::EndDigitPairs.check(&c([1, 11, 21, 2, 12, 3])));
    }

    #[test]
    fn test_decade_balance() {
        assert!(!Rule::DecadeBalance.check(&c([1, 2, 3, 5, 11, 21])));
        assert!(Rule::DecadeBalance.check(&c([1, 2, 3, 11, 12, 21])));
        assert!(!Rule::DecadeBalance.check(&c([41, 42, 43, 44, 1, 11])));
    }

    #[test]
    fn test_consecutive() {
        assert!(!Rule::Consecutive.check(&c([1, 2, 3, 10, 20, 30])));
        assert!(!Rule::Consecutive.check(&c([1, 2, 10, 11, 20, 30])));
        assert!(Rule::Consecutive.check(&c([1, 2, 10, 20, 30, 40])));
        assert_eq!(consecutive_pairs(&c([1, 2, 3, 4, 5, 6])), 5);
    }

    #[test]
    fn test_counting_rules() {
        // no primes
        assert!(!Rule::PrimeCount.check(&c([1, 4, 6, 8, 9, 10])));
        // four primes
        assert!(!Rule::PrimeCount.check(&c([2, 3, 5, 7, 8, 10])));
        assert!(!Rule::SquareCount.check(&c([1, 4, 9, 10, 12, 14])));
        assert!(!Rule::CompositeCount.check(&c([2, 3, 5, 7, 11, 13])));
        assert!(!Rule::MultipleOfThree.check(&c([1, 2, 4, 5, 7, 8])));
        assert!(!Rule::MultipleOfFour.check(&c([4, 8, 12, 16, 1, 2])));
        assert!(!Rule::MultipleOfFive.check(&c([5, 10, 15, 1, 2, 3])));
        assert!(!Rule::CornerCount.check(&c([3, 4, 5, 10, 11, 12])));
        assert!(!Rule::DoubleCount.check(&c([11, 22, 33, 1, 2, 3])));
    }

    #[test]
    fn test_end_digit_sum() {
        assert!(!Rule::EndDigitSum.check(&c([10, 20, 30, 40, 1, 2])));
        assert!(Rule::EndDigitSum.check(&c([3, 10, 17, 26, 30, 38])));
        assert!(!Rule::EndDigitSum.check(&c([9, 19, 29, 39, 8, 18])));
    }

    #[test]
    fn test_no_mirror() {
        assert!(!Rule::NoMirror.check(&c([3, 10, 17, 26, 30, 34])));
        assert!(!Rule::NoMirror.check(&c([6, 10, 17, 26, 30, 38])));
        assert!(Rule::NoMirror.check(&c([3, 10, 17, 26, 30, 38])));
    }

    #[test]
    fn test_color_bands() {
        // exactly three bands
        let three = c([1, 2, 11, 12, 21, 22]);
        assert_eq!(color_band_count(&three), 3);
        assert!(Rule::ColorBands.check(&three));

        // exactly four bands
        let four = c([1, 2, 3, 11, 21, 31]);
        assert_eq!(color_band_count(&four), 4);
        assert!(Rule::ColorBands.check(&four));

        // all five bands
        let five = c([5, 15, 25, 35, 45, 1]);
        assert_eq!(color_band_count(&five), 5);
        assert!(!Rule::ColorBands.check(&five));

        let two = c([1, 2, 3, 11, 12, 13]);
        assert!(!Rule::ColorBands.check(&two));
    }

    #[test]
    fn test_ac_value() {
        let tight = c([1, 2, 3, 4, 5, 6]);
        assert_eq!(ac_value(&tight), 5);
        assert!(!Rule::AcValue.check(&tight));

        let spread = c([1, 7, 13, 19, 28, 41]);
        assert_eq!(ac_value(&spread), 12);
        assert!(Rule::AcValue.check(&spread));
    }

    #[test]
    fn test_ac_value_extremes() {
        // every pairwise difference distinct
        assert_eq!(ac_value(&c([1, 2, 4, 8, 16, 32])), 15);
        // widest possible difference of 44
        assert_eq!(ac_value(&c([1, 2, 3, 4, 5, 45])), 9);
    }

    #[test]
    fn test_rules_are_pure() {
        let combos = [c([1, 2, 3, 4, 5, 6]), c([3, 10, 17, 26, 30, 38]), c([5, 15, 25, 35, 45, 1])];
        for rule in Rule::ALL {
            for combo in &combos {
                assert_eq!(rule.check(combo), rule.check(combo));
            }
        }
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("ac-value".parse::<Rule>().unwrap(), Rule::AcValue);
        assert_eq!("MULTIPLE_OF_3".parse::<Rule>().unwrap(), Rule::MultipleOfThree);
        assert!("lucky-seven".parse::<Rule>().is_err());
        for rule in Rule::ALL {
            assert_eq!(rule.name().parse::<Rule>().unwrap(), rule);
        }
    }

    #[test]
    fn test_fn_predicate() {
        let big = FnPredicate::new("sum-over-200", |c: &Combination| c.sum() > 200);
        assert_eq!(big.name(), "sum-over-200");
        assert!(big.test(&c([40, 41, 42, 43, 44, 45])));
        assert!(!big.test(&c([1, 2, 3, 4, 5, 6])));
    }
}
