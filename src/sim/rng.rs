//! Deterministic Lehmer generator
//!
//! Every stochastic decision in the simulation (invader targets, sprite
//! choice, particle spread) draws from one `LehmerRng`, so a run is fully
//! reproducible from its seed.

use rand::{RngCore, SeedableRng};

/// Multiplier of the minimal-standard generator
const MULTIPLIER: i32 = 16807;
/// 2^31 - 1
const MODULUS: i32 = 0x7fff_ffff;
/// Quotient used to split the state before multiplying
const QUOTIENT: i32 = 1_277_773;
/// Cross term paired with `QUOTIENT`
const CROSS: i32 = 2836;

/// Modulus used to map raw draws onto [0, 1): 2^28, not 2^31 - 1.
pub const UNIT_RANGE: u32 = 0x1000_0000;

/// Seed used when none is configured
pub const DEFAULT_SEED: i32 = 0xbeef_face_u32 as i32;

/// Linear-congruential generator over a signed 32-bit state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LehmerRng {
    state: i32,
}

impl Default for LehmerRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl LehmerRng {
    pub fn new(seed: i32) -> Self {
        Self { state: seed }
    }

    /// Reset the internal state
    pub fn seed(&mut self, seed: i32) {
        self.state = seed;
    }

    pub fn state(&self) -> i32 {
        self.state
    }

    /// Advance one step and return the new state.
    ///
    /// Arithmetic wraps at 32 bits, so states outside the ideal
    /// (0, 2^31 - 1) range still produce a fixed, reproducible sequence.
    pub fn next_u32(&mut self) -> u32 {
        let x = self.state;
        let hi = x / QUOTIENT;
        let lo = x % QUOTIENT;

        let mut t = MULTIPLIER
            .wrapping_mul(lo)
            .wrapping_sub(CROSS.wrapping_mul(hi));
        if t <= 0 {
            t = t.wrapping_add(MODULUS);
        }

        self.state = t;
        t as u32
    }

    /// Uniform sample in [0, 1).
    ///
    /// Computed in f64 so the largest draw stays strictly below 1.0.
    pub fn uniform_unit(&mut self) -> f64 {
        let draw = self.next_u32() % UNIT_RANGE;
        f64::from(draw) / f64::from(UNIT_RANGE)
    }

    /// Uniform sample between `min` and `max` (either order)
    pub fn uniform_range(&mut self, min: f32, max: f32) -> f32 {
        let range = f64::from(max) - f64::from(min);
        (f64::from(min) + range * self.uniform_unit()) as f32
    }
}

impl RngCore for LehmerRng {
    fn next_u32(&mut self) -> u32 {
        LehmerRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(LehmerRng::next_u32(self));
        let hi = u64::from(LehmerRng::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = LehmerRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for LehmerRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed))
    }
}
