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

use std::fmt::Display;
use std::fmt::Formatter;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A generator seed. The search grid never exceeds one million.
pub type Seed = u32;

/// Upper bound (inclusive) of the values emitted by the general-purpose
/// generator.
pub const UNIFORM_MAX: u32 = 100_000;

const LCG_A: u32 = 1664525;
const LCG_C: u32 = 1013904223;

/// The pseudo-random methods the search chooses between.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Xorshift,
    MersenneTwister,
    MiddleSquare,
    Lcg,
}

impl Method {
    /// Every method, in the order the search visits them. Ties between
    /// methods are broken in favour of the earlier entry.
    pub const ALL: [Method; 4] = [
        Method::Xorshift,
        Method::MersenneTwister,
        Method::MiddleSquare,
        Method::Lcg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Xorshift => "xorshift",
            Method::MersenneTwister => "mersenne-twister",
            Method::MiddleSquare => "middle-square",
            Method::Lcg => "lcg",
        }
    }

    /// Generate `count` values from the given seed.
    pub fn generate(&self, seed: Seed, count: usize) -> Vec<u32> {
        match self {
            Method::Xorshift => Xorshift32::from_seed(seed).take(count).collect(),
            Method::MersenneTwister => {
                let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
                (0..count)
                    .map(|_| rng.random_range(0..=UNIFORM_MAX))
                    .collect()
            }
            Method::MiddleSquare => MiddleSquare::from_seed(seed).take(count).collect(),
            Method::Lcg => Lcg::from_seed(seed).take(count).collect(),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Xorshift => write!(f, "Xorshift"),
            Method::MersenneTwister => write!(f, "Mersenne Twister"),
            Method::MiddleSquare => write!(f, "Middle Square"),
            Method::Lcg => write!(f, "LCG"),
        }
    }
}

impl TryFrom<&str> for Method {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "xorshift" => Ok(Method::Xorshift),
            "mersenne-twister" => Ok(Method::MersenneTwister),
            "middle-square" => Ok(Method::MiddleSquare),
            "lcg" => Ok(Method::Lcg),
            _ => fail(format!("invalid method string: {value}")),
        }
    }
}

/// Marsaglia's 32-bit xorshift with the (13, 17, 5) triple.
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Zero is a fixed point of the transform, so it is replaced with one.
    pub fn from_seed(seed: Seed) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Iterator for Xorshift32 {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_u32())
    }
}

/// Von Neumann's middle-square method.
///
/// The width of the extracted window is the number of decimal digits in the
/// seed. Whenever the window comes out as zero, the working value restarts
/// from `seed + 1` so the sequence cannot collapse permanently.
pub struct MiddleSquare {
    seed: u64,
    width: u32,
    value: u64,
}

impl MiddleSquare {
    pub fn from_seed(seed: Seed) -> Self {
        let seed = u64::from(seed);
        Self {
            seed,
            width: decimal_digits(seed),
            value: seed,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let squared = self.value * self.value;
        // The square is zero-padded to twice the width, but a restarted value
        // can carry an extra digit, in which case the square is wider.
        let len = decimal_digits(squared).max(2 * self.width);
        let start = (len - self.width) / 2;
        let shift = len - start - self.width;
        let middle = (squared / 10u64.pow(shift)) % 10u64.pow(self.width);
        self.value = if middle == 0 { self.seed + 1 } else { middle };
        middle as u32
    }
}

impl Iterator for MiddleSquare {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_u32())
    }
}

/// Linear congruential generator with the Numerical Recipes constants,
/// modulo 2^32.
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn from_seed(seed: Seed) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        self.state
    }
}

impl Iterator for Lcg {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_u32())
    }
}

fn decimal_digits(n: u64) -> u32 {
    if n == 0 { 1 } else { n.ilog10() + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_xorshift_known_values() {
        let actual = Method::Xorshift.generate(1, 3);
        assert_eq!(actual, vec![270369, 67634689, 2647435461]);
    }

    #[test]
    fn test_xorshift_zero_seed_is_remapped() {
        assert_eq!(
            Method::Xorshift.generate(0, 10),
            Method::Xorshift.generate(1, 10)
        );
    }

    #[test]
    fn test_xorshift_never_reaches_zero() {
        for seed in (0..=1_000_000).step_by(10_000) {
            let values = Method::Xorshift.generate(seed, 1000);
            assert!(values.iter().all(|v| *v != 0), "seed {seed}");
        }
    }

    #[test]
    fn test_lcg_recurrence() {
        let seeds = [0, 1, 100, 999_900, 1_000_000];
        for seed in seeds {
            let values = Method::Lcg.generate(seed, 50);
            let mut x: u64 = u64::from(seed);
            for value in values {
                x = (1664525 * x + 1013904223) % (1 << 32);
                assert_eq!(u64::from(value), x);
            }
        }
    }

    #[test]
    fn test_lcg_first_value() {
        assert_eq!(Method::Lcg.generate(0, 1), vec![1013904223]);
    }

    #[test]
    fn test_middle_square_known_values() {
        // 1234^2 = 01522756 -> 5227, 5227^2 = 27321529 -> 3215.
        let actual = Method::MiddleSquare.generate(1234, 2);
        assert_eq!(actual, vec![5227, 3215]);
    }

    #[test]
    fn test_middle_square_odd_width() {
        // 123^2 = 015129, the window starts at offset 1.
        let actual = Method::MiddleSquare.generate(123, 1);
        assert_eq!(actual, vec![151]);
    }

    #[test]
    fn test_middle_square_restarts_after_zero() {
        // 1000^2 = 01000000, the window is 0000.
        let mut squares = MiddleSquare::from_seed(1000);
        assert_eq!(squares.next_u32(), 0);
        // Restarted from 1001: 1001^2 = 01002001 -> 0020.
        assert_eq!(squares.next_u32(), 20);
    }

    #[test]
    fn test_middle_square_wider_square_after_restart() {
        // Six-digit seed restarting to a seven-digit value.
        let mut squares = MiddleSquare::from_seed(999_999);
        squares.value = 1_000_000;
        // 10^12 has 13 digits, the window is digits 3..9.
        assert_eq!(squares.next_u32(), 0);
        assert_eq!(squares.value, 1_000_000);
    }

    #[test]
    fn test_middle_square_never_stuck_at_zero() {
        for seed in (0..=1_000_000).step_by(100) {
            let mut squares = MiddleSquare::from_seed(seed);
            for _ in 0..20 {
                let value = squares.next_u32();
                if value == 0 {
                    assert_eq!(squares.value, u64::from(seed) + 1);
                } else {
                    assert_eq!(squares.value, u64::from(value));
                }
            }
        }
    }

    #[test]
    fn test_uniform_range_and_replay() {
        let a = Method::MersenneTwister.generate(4200, 500);
        let b = Method::MersenneTwister.generate(4200, 500);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| *v <= UNIFORM_MAX));
        assert_ne!(a, Method::MersenneTwister.generate(4300, 500));
    }

    #[test]
    fn test_generate_length() {
        for method in Method::ALL {
            assert_eq!(method.generate(700, 0).len(), 0);
            assert_eq!(method.generate(700, 37).len(), 37);
        }
    }

    #[test]
    fn test_method_string_roundtrip() -> Fallible<()> {
        for method in Method::ALL {
            assert_eq!(method, Method::try_from(method.as_str())?);
        }
        Ok(())
    }

    #[test]
    fn test_method_serialization_format() -> Fallible<()> {
        for method in Method::ALL {
            let serialized = serde_json::to_string(&method)?;
            assert_eq!(serialized, format!("\"{}\"", method.as_str()));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_method_string() {
        for s in ["", "Xorshift", "mt"] {
            assert!(Method::try_from(s).is_err());
        }
    }
}
