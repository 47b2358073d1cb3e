//! Pseudo-random generators for Monte Carlo sampling.
//!
//! The generator family referenced from <https://prng.di.unimi.it>: a
//! splitmix64 seed expander feeding one of three xorshift/rotate core
//! generators. All of them implement [`rand::RngCore`] with a full 64-bit
//! output range so they plug into the wider `rand` ecosystem.
//!
//! Instances are cheap and deterministic: the same seed always reproduces
//! the same draw sequence. They carry no synchronization — every worker
//! thread owns its own instance, seeded independently.

use rand::{Error, RngCore};

/// splitmix64 seed expander.
///
/// One 64-bit accumulator advanced by a fixed odd increment, avalanche-mixed
/// with two xorshift/multiply rounds per draw. Used to expand a single seed
/// into the larger state of the core generators.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    x: u64,
}

impl SplitMix64 {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { x: seed }
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        self.x = self.x.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.x;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

/// Expand one seed into N state words.
fn expand_seed<const N: usize>(seed: u64) -> [u64; N] {
    let mut init = SplitMix64::new(seed);
    let mut s = [0u64; N];
    for word in &mut s {
        *word = init.next();
    }
    s
}

/// xoshiro256++: the general-purpose generator (4 state words).
#[derive(Debug, Clone)]
pub struct Xoshiro256pp {
    s: [u64; 4],
}

impl Xoshiro256pp {
    pub fn new(seed: u64) -> Self {
        Self {
            s: expand_seed(seed),
        }
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        let result = self.s[0]
            .wrapping_add(self.s[3])
            .rotate_left(23)
            .wrapping_add(self.s[0]);
        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;

        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

/// xoshiro256+: slightly cheaper combining step (plain add), intended for
/// floating-point draws where the low bits don't matter.
#[derive(Debug, Clone)]
pub struct Xoshiro256p {
    s: [u64; 4],
}

impl Xoshiro256p {
    pub fn new(seed: u64) -> Self {
        Self {
            s: expand_seed(seed),
        }
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        let result = self.s[0].wrapping_add(self.s[3]);
        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;

        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

/// xoroshiro128++: the small-state generator (2 state words).
#[derive(Debug, Clone)]
pub struct Xoroshiro128pp {
    s: [u64; 2],
}

impl Xoroshiro128pp {
    pub fn new(seed: u64) -> Self {
        Self {
            s: expand_seed(seed),
        }
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        let s0 = self.s[0];
        let mut s1 = self.s[1];
        let result = s0.wrapping_add(s1).rotate_left(17).wrapping_add(s0);

        s1 ^= s0;
        self.s[0] = s0.rotate_left(49) ^ s1 ^ (s1 << 21);
        self.s[1] = s1.rotate_left(28);

        result
    }
}

macro_rules! impl_rng_core {
    ($($ty:ty),*) => {$(
        impl RngCore for $ty {
            #[inline]
            fn next_u32(&mut self) -> u32 {
                (self.next() >> 32) as u32
            }

            #[inline]
            fn next_u64(&mut self) -> u64 {
                self.next()
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                let mut chunks = dest.chunks_exact_mut(8);
                for chunk in &mut chunks {
                    chunk.copy_from_slice(&self.next().to_le_bytes());
                }
                let rem = chunks.into_remainder();
                if !rem.is_empty() {
                    let bytes = self.next().to_le_bytes();
                    rem.copy_from_slice(&bytes[..rem.len()]);
                }
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }
    )*};
}

impl_rng_core!(Xoshiro256pp, Xoshiro256p, Xoroshiro128pp);

/// Uniform draw in [0, 1) from the top 24 bits of one 64-bit draw.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u64() >> 40) as f32 * (1.0 / (1u64 << 24) as f32)
}
