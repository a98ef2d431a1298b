//! Ordered, composable collections of predicates

use std::sync::Arc;

use super::predicate::{Predicate, Rule};
use crate::error::{LottoForgeError, Result};
use crate::types::Combination;

/// Canonical rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Ten balance rules (parity, ranges, number classes)
    Basic,
    /// All eighteen rules
    #[default]
    Full,
}

impl Preset {
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Preset::Basic => &BASIC_RULES,
            Preset::Full => &Rule::ALL,
        }
    }

    pub fn predicates(&self) -> PredicateSet {
        PredicateSet::from_rules(self.rules().iter().copied())
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Basic => write!(f, "basic"),
            Preset::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = LottoForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Preset::Basic),
            "full" => Ok(Preset::Full),
            other => Err(LottoForgeError::validation(format!(
                "Unknown preset '{}'. Use 'basic' or 'full'",
                other
            ))),
        }
    }
}

const BASIC_RULES: [Rule; 10] = [
    Rule::HighLow,
    Rule::OddEven,
    Rule::DecadeBalance,
    Rule::Consecutive,
    Rule::PrimeCount,
    Rule::SquareCount,
    Rule::CompositeCount,
    Rule::EndDigitSum,
    Rule::MultipleOfThree,
    Rule::MultipleOfFour,
];

/// Predicates evaluated in insertion order; a combination is valid when all pass
#[derive(Clone, Default)]
pub struct PredicateSet {
    predicates: Vec<Arc<dyn Predicate>>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basic() -> Self {
        Preset::Basic.predicates()
    }

    pub fn full() -> Self {
        Preset::Full.predicates()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.push(rule);
        }
        set
    }

    /// Build from rule names such as `"odd-even"`, keeping the given order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let rules = names
            .iter()
            .map(|name| name.as_ref().parse::<Rule>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rules(rules))
    }

    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.predicates.push(Arc::new(predicate));
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, predicate: impl Predicate + 'static) -> Self {
        self.push(predicate);
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.predicates.iter().map(|p| p.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Predicate> {
        self.predicates.iter().map(|p| p.as_ref())
    }

    /// Name of the first predicate that rejects the combination
    pub fn first_failure(&self, combination: &Combination) -> Option<&str> {
        self.predicates
            .iter()
            .find(|p| !p.test(combination))
            .map(|p| p.name())
    }

    pub fn accepts(&self, combination: &Combination) -> bool {
        self.first_failure(combination).is_none()
    }
}

impl std::fmt::Debug for PredicateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl From<Preset> for PredicateSet {
    fn from(preset: Preset) -> Self {
        preset.predicates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::predicate::FnPredicate;

    fn c(numbers: [u8; 6]) -> Combination {
        Combination::new(numbers).unwrap()
    }

    #[test]
    fn test_basic_rules_in_order() {
        assert_eq!(
            PredicateSet::basic().names(),
            vec![
                "high-low",
                "odd-even",
                "decade-balance",
                "consecutive",
                "prime-count",
                "square-count",
                "composite-count",
                "end-digit-sum",
                "multiple-of-3",
                "multiple-of-4",
            ]
        );
    }

    #[test]
    fn test_full_rules_in_order() {
        assert_eq!(
            PredicateSet::full().names(),
            vec![
                "high-low",
                "odd-even",
                "sum-range",
                "end-digit-pairs",
                "decade-balance",
                "consecutive",
                "prime-count",
                "square-count",
                "composite-count",
                "end-digit-sum",
                "no-mirror",
                "multiple-of-3",
                "multiple-of-4",
                "multiple-of-5",
                "corner-count",
                "color-bands",
                "double-count",
                "ac-value",
            ]
        );
    }

    #[test]
    fn test_basic_accepts_what_full_rejects() {
        // 34 is a mirror number; everything else in the basic set holds
        let combo = c([3, 10, 17, 26, 30, 34]);
        assert!(PredicateSet::basic().accepts(&combo));
        assert_eq!(PredicateSet::full().first_failure(&combo), Some("no-mirror"));
    }

    #[test]
    fn test_first_failure_short_circuits_in_order() {
        let set = PredicateSet::from_rules([Rule::Consecutive, Rule::AcValue]);
        // fails both; the first one listed is reported
        assert_eq!(set.first_failure(&c([1, 2, 3, 4, 5, 6])), Some("consecutive"));
        assert_eq!(set.first_failure(&c([1, 3, 5, 7, 9, 11])), Some("ac-value"));

        let reversed = PredicateSet::from_rules([Rule::AcValue, Rule::Consecutive]);
        assert_eq!(reversed.first_failure(&c([1, 2, 3, 4, 5, 6])), Some("ac-value"));
    }

    #[test]
    fn test_from_names() {
        let set = PredicateSet::from_names(&["ac-value", "odd-even"]).unwrap();
        assert_eq!(set.names(), vec!["ac-value", "odd-even"]);
        assert!(PredicateSet::from_names(&["nope"]).is_err());
    }

    #[test]
    fn test_custom_predicates_compose() {
        let set = PredicateSet::basic()
            .with(FnPredicate::new("has-seven", |c: &Combination| c.contains(7)));
        assert_eq!(set.len(), 11);
        assert_eq!(set.first_failure(&c([3, 10, 17, 26, 30, 38])), Some("has-seven"));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("basic".parse::<Preset>().unwrap(), Preset::Basic);
        assert_eq!(" FULL ".parse::<Preset>().unwrap(), Preset::Full);
        assert!("all".parse::<Preset>().is_err());
        assert_eq!(Preset::default(), Preset::Full);
    }
}
