//! Uniform draws of six distinct numbers

use rand::rngs::{OsRng, StdRng};
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::error::{LottoForgeError, Result};
use crate::types::{Combination, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

/// Seeded when `seed` is given, otherwise seeded from the operating system
pub fn make_rng(seed: Option<u64>) -> Result<StdRng> {
    match seed {
        Some(s) => Ok(StdRng::seed_from_u64(s)),
        None => Ok(StdRng::from_rng(OsRng)?),
    }
}

/// One uniformly random combination out of C(45, 6)
pub fn sample_combination<R: Rng + ?Sized>(rng: &mut R) -> Combination {
    let mut numbers = [0u8; PICK_COUNT];
    let picked = index::sample(rng, MAX_NUMBER as usize, PICK_COUNT);
    for (slot, idx) in numbers.iter_mut().zip(picked.iter()) {
        *slot = idx as u8 + MIN_NUMBER;
    }
    Combination::from_distinct(numbers)
}

/// Six numbers chosen uniformly from `pool`; `None` when the pool has fewer than six distinct entries
pub fn sample_from_pool<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> Result<Option<Combination>> {
    let mut distinct: Vec<u8> = Vec::with_capacity(pool.len());
    for &n in pool {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            return Err(LottoForgeError::validation(format!(
                "Pool number {} out of range ({}-{})",
                n, MIN_NUMBER, MAX_NUMBER
            )));
        }
        if !distinct.contains(&n) {
            distinct.push(n);
        }
    }

    if distinct.len() < PICK_COUNT {
        return Ok(None);
    }

    let mut numbers = [0u8; PICK_COUNT];
    for (slot, &n) in numbers.iter_mut().zip(distinct.choose_multiple(rng, PICK_COUNT)) {
        *slot = n;
    }
    Ok(Some(Combination::from_distinct(numbers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid() {
        let mut rng = make_rng(Some(7)).unwrap();
        for _ in 0..10_000 {
            let combo = sample_combination(&mut rng);
            let n = combo.numbers();
            assert!(n.windows(2).all(|w| w[0] < w[1]));
            assert!(n.iter().all(|&x| (1..=45).contains(&x)));
        }
    }

    #[test]
    fn test_every_number_reachable() {
        let mut rng = make_rng(Some(11)).unwrap();
        let mut seen = [false; 46];
        for _ in 0..2_000 {
            for n in sample_combination(&mut rng).iter() {
                seen[n as usize] = true;
            }
        }
        assert!(seen[1..].iter().all(|&s| s));
        assert!(!seen[0]);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = sample_combination(&mut make_rng(Some(42)).unwrap());
        let b = sample_combination(&mut make_rng(Some(42)).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_entropy_rng() {
        let mut rng = make_rng(None).unwrap();
        let combo = sample_combination(&mut rng);
        assert_eq!(combo.numbers().len(), 6);
    }

    #[test]
    fn test_pool_too_small() {
        let mut rng = make_rng(Some(1)).unwrap();
        assert_eq!(sample_from_pool(&[1, 2, 3, 4, 5], &mut rng).unwrap(), None);
        // duplicates do not count twice
        assert_eq!(sample_from_pool(&[1, 1, 2, 3, 4, 5], &mut rng).unwrap(), None);
        assert_eq!(sample_from_pool(&[], &mut rng).unwrap(), None);
    }

    #[test]
    fn test_pool_pick_stays_in_pool() {
        let pool = [34, 12, 27, 1, 45, 13, 18, 33, 40, 7];
        let mut rng = make_rng(Some(3)).unwrap();
        for _ in 0..200 {
            let combo = sample_from_pool(&pool, &mut rng).unwrap().unwrap();
            assert!(combo.iter().all(|n| pool.contains(&n)));
            assert!(combo.numbers().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_exact_pool() {
        let mut rng = make_rng(Some(5)).unwrap();
        let combo = sample_from_pool(&[6, 5, 4, 3, 2, 1], &mut rng).unwrap().unwrap();
        assert_eq!(combo.numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_pool_out_of_range() {
        let mut rng = make_rng(Some(5)).unwrap();
        assert!(sample_from_pool(&[0, 1, 2, 3, 4, 5], &mut rng).is_err());
        assert!(sample_from_pool(&[1, 2, 3, 4, 5, 46], &mut rng).is_err());
    }
}
