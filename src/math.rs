//! Numeric helpers for the game core.
//!
//! Pure functions over the 1-9 number domain: summation, inclusive ranges,
//! inclusive random picks, and the weighted subset-sum pick used to choose
//! the next star count.
//!
//! Random-consuming functions take `&mut impl Rng` so callers can pass a
//! seeded RNG for deterministic tests.

use rand::Rng;

/// Sum a slice of numbers. Empty slices sum to 0.
pub fn sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| u32::from(n)).sum()
}

/// All integers from `min` to `max` inclusive, ascending.
///
/// Returns an empty vector when `max < min`.
pub fn range(min: u8, max: u8) -> Vec<u8> {
    (min..=max).collect()
}

/// Pick a uniform random integer in `[min, max]` inclusive.
pub fn random_int(min: u8, max: u8, rng: &mut impl Rng) -> u8 {
    rng.gen_range(min..=max)
}

/// Pick a random achievable subset sum of `numbers`, capped at `max`.
///
/// Enumerates every non-empty subset whose sum is at most `max` and picks
/// one of their sums uniformly. The pool keeps one entry per subset, so a
/// sum reachable by k subsets is k times as likely to be chosen.
///
/// Enumeration is incremental: starting from the empty subset, each number
/// extends every subset found so far, keeping extensions whose sum stays
/// within `max`. Exponential in `numbers.len()`, which never exceeds 9 here.
pub fn random_sum_in(numbers: &[u8], max: u8, rng: &mut impl Rng) -> Result<u8, MathError> {
    let mut sets: Vec<Vec<u8>> = vec![Vec::new()];
    let mut sums: Vec<u8> = Vec::new();

    for &number in numbers {
        let len = sets.len();
        for j in 0..len {
            let mut candidate_set = sets[j].clone();
            candidate_set.push(number);
            let candidate_sum = sum(&candidate_set);
            if candidate_sum <= u32::from(max) {
                sums.push(candidate_sum as u8);
                sets.push(candidate_set);
            }
        }
    }

    if sums.is_empty() {
        return Err(MathError::EmptyCandidatePool);
    }

    let index = rng.gen_range(0..sums.len());
    Ok(sums[index])
}

/// Math helper errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// No non-empty subset sums to `max` or less.
    EmptyCandidatePool,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCandidatePool => write!(f, "No subset sums within the allowed maximum"),
        }
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sum_empty() {
        assert_eq!(sum(&[]), 0);
    }

    #[test]
    fn test_sum_values() {
        assert_eq!(sum(&[1]), 1);
        assert_eq!(sum(&[2, 3, 4]), 9);
        assert_eq!(sum(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), 45);
    }

    #[test]
    fn test_range_inclusive() {
        assert_eq!(range(1, 9), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(range(3, 5), vec![3, 4, 5]);
        assert_eq!(range(7, 7), vec![7]);
    }

    #[test]
    fn test_range_properties() {
        for min in 1..=9u8 {
            for max in min..=9u8 {
                let r = range(min, max);
                assert_eq!(r.len(), (max - min + 1) as usize);
                assert_eq!(r[0], min);
                assert_eq!(*r.last().unwrap(), max);
                assert!(r.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_range_empty_when_inverted() {
        assert!(range(5, 3).is_empty());
    }

    #[test]
    fn test_random_int_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let n = random_int(1, 9, &mut rng);
            assert!((1..=9).contains(&n));
        }
        // Degenerate range
        assert_eq!(random_int(4, 4, &mut rng), 4);
    }

    #[test]
    fn test_random_sum_in_is_achievable() {
        let mut rng = StdRng::seed_from_u64(42);
        let numbers = vec![1, 4, 5, 6, 7, 8, 9];

        for _ in 0..200 {
            let picked = random_sum_in(&numbers, 9, &mut rng).unwrap();
            assert!(picked <= 9);
            assert!(is_subset_sum(&numbers, picked));
        }
    }

    #[test]
    fn test_random_sum_in_single_number() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(random_sum_in(&[6], 9, &mut rng).unwrap(), 6);
    }

    #[test]
    fn test_random_sum_in_empty_pool() {
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(
            random_sum_in(&[], 9, &mut rng),
            Err(MathError::EmptyCandidatePool)
        );
        // Every number exceeds the cap
        assert_eq!(
            random_sum_in(&[7, 8, 9], 5, &mut rng),
            Err(MathError::EmptyCandidatePool)
        );
    }

    /// Brute-force check that `target` is a non-empty subset sum of `numbers`.
    fn is_subset_sum(numbers: &[u8], target: u8) -> bool {
        (1..1u32 << numbers.len()).any(|mask| {
            let total: u32 = numbers
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &n)| u32::from(n))
                .sum();
            total == u32::from(target)
        })
    }
}
