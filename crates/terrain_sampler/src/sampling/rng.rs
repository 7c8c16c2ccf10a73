//! Seeded xorshift random source used by the Poisson-disc sampler.
use std::f32::consts::TAU;

use glam::Vec2;
use rand::RngCore;

/// Substitute state used when a seed would leave the generator at zero.
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// 32-bit xorshift generator (shift triple 13, 17, 5).
///
/// Every draw returns the state *before* advancing, so the first value equals
/// the seed. The all-zero state is a fixed point of xorshift and is never used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator from a raw state. Zero is remapped to a fixed non-zero value.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Create a generator from a user-facing seed, offset by one so that seed `0` is valid.
    pub fn from_user_seed(seed: u32) -> Self {
        Self::new(seed.wrapping_add(1))
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    pub fn next_u32_raw(&mut self) -> u32 {
        let out = self.state;
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        out
    }

    /// Uniform index in `[0, len)`. Returns 0 for `len == 0`.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        let len = len.min(u32::MAX as usize) as u64;
        ((self.next_u32_raw() as u64 * len) >> 32) as usize
    }

    /// Uniform float in `[0, 1)` built from the top 23 bits of a draw.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        f32::from_bits(0x3f80_0000 | (self.next_u32_raw() >> 9)) - 1.0
    }

    /// Uniform float in `[min, max)`.
    #[inline]
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        self.next_f32() * (max - min) + min
    }

    /// Uniformly distributed unit vector, `(cos θ, sin θ)` for `θ` in `[0, 2π)`.
    #[inline]
    pub fn next_direction(&mut self) -> Vec2 {
        let angle = self.next_f32() * TAU;
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos, sin)
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        self.next_u32_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32_raw() as u64;
        let hi = self.next_u32_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
