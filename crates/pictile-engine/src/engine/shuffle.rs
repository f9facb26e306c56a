use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::Board;

/// Seed for reproducible shuffles.
///
/// A 128-bit value written as 32 hexadecimal digits, both in JSON and on the
/// command line. Shuffling boards of the same grid size with the same seed
/// always produces the same arrangement.
///
/// # Example
///
/// ```
/// use pictile_engine::{Board, GridSize, ShuffleRng, ShuffleSeed, shuffle};
/// use rand::Rng as _;
///
/// let seed: ShuffleSeed = rand::rng().random();
/// let size = GridSize::new(4).unwrap();
///
/// let mut first = Board::numbered(size);
/// let mut second = Board::numbered(size);
/// shuffle(&mut first, &mut ShuffleRng::with_seed(seed));
/// shuffle(&mut second, &mut ShuffleRng::with_seed(seed));
///
/// assert_eq!(first.arrangement(), second.arrangement());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShuffleSeed([u8; 16]);

impl fmt::Display for ShuffleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ShuffleSeed {
    type Err = String;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShuffleSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShuffleSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<ShuffleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShuffleSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShuffleSeed(seed)
    }
}

/// Source of the swap partner chosen at each Fisher–Yates step.
pub trait SlotPicker {
    /// Returns an index in `0..=upper`.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Uniform [`SlotPicker`] backed by a seeded PCG generator.
#[derive(Debug, Clone)]
pub struct ShuffleRng {
    seed: ShuffleSeed,
    rng: Pcg32,
}

impl Default for ShuffleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleRng {
    /// Creates a generator with a seed drawn from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ShuffleSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> ShuffleSeed {
        self.seed
    }
}

impl SlotPicker for ShuffleRng {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }
}

/// Randomly permutes the tiles of `board` with the Fisher–Yates algorithm.
///
/// Walks `i` from the last slot down to 1 and exchanges slot `i` with slot
/// `picker.pick(i)`. With a uniform picker every arrangement is equally
/// likely. Tiles keep their original index; only their slots change.
/// Boards with fewer than two tiles are left as they are.
pub fn shuffle<P>(board: &mut Board, picker: &mut P)
where
    P: SlotPicker + ?Sized,
{
    for i in (1..board.tile_count()).rev() {
        let j = picker.pick(i);
        assert!(j <= i, "picked slot {j} is beyond {i}");
        board.swap_slots(i, j);
    }
    tracing::debug!(
        grid_size = %board.grid_size(),
        misplaced = board.misplaced_count(),
        "board shuffled"
    );
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::GridSize;

    fn seed_from_bytes(bytes: [u8; 16]) -> ShuffleSeed {
        ShuffleSeed(bytes)
    }

    /// Replays a fixed list of picks.
    struct ScriptedPicker(Vec<usize>);

    impl SlotPicker for ScriptedPicker {
        fn pick(&mut self, _upper: usize) -> usize {
            self.0.remove(0)
        }
    }

    mod seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: ShuffleSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: ShuffleSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = seed_from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn test_parse_uppercase_and_zero() {
            let seed: ShuffleSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

            let zero: ShuffleSeed = "00000000000000000000000000000000".parse().unwrap();
            assert_eq!(zero, seed_from_bytes([0; 16]));
        }

        #[test]
        fn test_rejects_bad_input() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = input.parse::<ShuffleSeed>().unwrap_err();
                assert!(err.contains("invalid hex"), "{input:?}: {err}");
            }
            let result: Result<ShuffleSeed, _> = serde_json::from_str("\"1234\"");
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_scripted_picks_follow_fisher_yates_order() {
        let mut board = Board::numbered(GridSize::new(2).unwrap());
        // i = 3 picks 2, i = 2 picks 2, i = 1 picks 0
        shuffle(&mut board, &mut ScriptedPicker(vec![2, 2, 0]));
        assert_eq!(board.arrangement(), vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_shuffle_keeps_a_permutation() {
        let mut rng = ShuffleRng::with_seed(seed_from_bytes([7; 16]));
        for n in 2..=8 {
            let mut board = Board::numbered(GridSize::new(n).unwrap());
            shuffle(&mut board, &mut rng);

            let mut arrangement = board.arrangement();
            arrangement.sort_unstable();
            assert_eq!(arrangement, (0..n * n).collect::<Vec<_>>());
            for (slot, tile) in board.tiles().iter().enumerate() {
                assert_eq!(tile.current_index(), slot);
            }
        }
    }

    #[test]
    fn test_same_seed_same_arrangement() {
        let seed = seed_from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);
        let size = GridSize::new(5).unwrap();
        let mut first = Board::numbered(size);
        let mut second = Board::numbered(size);
        shuffle(&mut first, &mut ShuffleRng::with_seed(seed));
        shuffle(&mut second, &mut ShuffleRng::with_seed(seed));
        assert_eq!(first.arrangement(), second.arrangement());
    }

    #[test]
    fn test_uniform_over_all_permutations() {
        const TRIALS: usize = 24_000;
        // chi-square critical value for 23 degrees of freedom at p = 0.001
        const CRITICAL: f64 = 49.728;

        let size = GridSize::new(2).unwrap();
        let mut rng = ShuffleRng::with_seed(seed_from_bytes([0x5a; 16]));
        let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
        for _ in 0..TRIALS {
            let mut board = Board::numbered(size);
            shuffle(&mut board, &mut rng);
            *counts.entry(board.arrangement()).or_default() += 1;
        }

        assert_eq!(counts.len(), 24, "every permutation of 4 tiles must occur");
        #[expect(clippy::cast_precision_loss)]
        let expected = TRIALS as f64 / 24.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                #[expect(clippy::cast_precision_loss)]
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(
            chi_square < CRITICAL,
            "chi-square {chi_square:.2} exceeds {CRITICAL}"
        );
    }
}
