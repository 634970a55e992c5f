//! Seeded randomness for encounter rolls.
//!
//! Chance rolls, random target picks and spawn-point searches all draw from
//! an [`RngOracle`] with an explicit seed, so an encounter replays identically
//! from the same encounter seed and the same sequence of ticks.

/// Stateless seeded generator: equal seeds yield equal values.
pub trait RngOracle: Send + Sync {
    /// Raw 32-bit output for `seed`.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)` with 24 bits of precision.
    fn unit(&self, seed: u64) -> f32 {
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&self, seed: u64, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed for one roll.
///
/// * `encounter_seed` - Base seed chosen when the encounter is built
/// * `frame` - Tick counter of the controller
/// * `nonce` - Roll counter within the encounter (increments each roll)
/// * `stream` - Caller tag separating independent kinds of rolls
pub fn compute_seed(encounter_seed: u64, frame: u64, nonce: u64, stream: u32) -> u64 {
    let mut hash = encounter_seed;

    hash ^= frame.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= nonce.wrapping_mul(0x517cc1b727220a95);
    hash ^= (stream as u64).wrapping_mul(0x85ebca6b);

    // SplitMix64-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
