// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// The outcome of scoring a sequence against a class size.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Population variance of the per-slot counts around the uniform
    /// expectation. Zero means every slot was hit equally often.
    pub variance: f64,
    /// The sequence reduced modulo the class size.
    pub pool: Vec<usize>,
}

impl Evaluation {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Reduce `sequence` modulo `n` and score how unevenly the residues fall.
///
/// The squared deviations are averaged over the `n` slots, not over the
/// number of draws.
///
/// # Panics
///
/// Panics if `n` is zero. [`SearchParams::validate`] rules this out for the
/// search.
///
/// [`SearchParams::validate`]: crate::search::SearchParams::validate
pub fn evaluate(sequence: &[u32], n: usize) -> Evaluation {
    assert!(n > 0, "modulus must be positive");
    let pool: Vec<usize> = sequence.iter().map(|x| *x as usize % n).collect();
    let variance = slot_variance(&pool, n);
    Evaluation { variance, pool }
}

/// Variance of the per-slot occurrence counts of a pool whose entries are
/// all below `n`.
pub(crate) fn slot_variance(pool: &[usize], n: usize) -> f64 {
    let mut counts: Vec<usize> = vec![0; n];
    for slot in pool {
        counts[*slot] += 1;
    }
    let expected: f64 = pool.len() as f64 / n as f64;
    let sum: f64 = counts
        .iter()
        .map(|c| {
            let d = *c as f64 - expected;
            d * d
        })
        .sum();
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_pool_scores_zero() {
        let sequence: Vec<u32> = (0..120).collect();
        let eval = evaluate(&sequence, 40);
        assert_eq!(eval.variance, 0.0);
        assert_eq!(eval.pool.len(), 120);
        assert_eq!(eval.pool[41], 1);
    }

    #[test]
    fn test_single_slot() {
        let eval = evaluate(&[987654321], 1);
        assert_eq!(eval.variance, 0.0);
        assert_eq!(eval.pool, vec![0]);
    }

    #[test]
    fn test_known_variance() {
        // Residues mod 3: [0, 0, 0, 1]; counts [3, 1, 0]; expected 4/3.
        let eval = evaluate(&[3, 6, 9, 10], 3);
        assert_eq!(eval.pool, vec![0, 0, 0, 1]);
        let e = 4.0 / 3.0;
        let expected = ((3.0 - e) * (3.0 - e) + (1.0 - e) * (1.0 - e) + e * e) / 3.0;
        assert!((eval.variance - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unused_slots_count_as_zero() {
        // Everything lands in slot 0 of 4; counts [4, 0, 0, 0], expected 1.
        let eval = evaluate(&[4, 8, 12, 16], 4);
        assert_eq!(eval.variance, 3.0);
        assert_eq!(eval.std_dev(), 3.0f64.sqrt());
    }

    #[test]
    #[should_panic(expected = "modulus must be positive")]
    fn test_zero_modulus() {
        evaluate(&[1, 2, 3], 0);
    }

    #[test]
    fn test_empty_sequence() {
        let eval = evaluate(&[], 5);
        assert_eq!(eval.variance, 0.0);
        assert!(eval.pool.is_empty());
    }
}
