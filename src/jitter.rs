//! Sub-pixel jitter sources.  Each row of the image gets its own
//! generator, seeded from the render seed and the row index, so no
//! generator state is ever shared between workers and the image
//! comes out the same no matter how many threads drew it.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;

/// A stream of offsets in [0, 1).
pub trait Jitter {
    /// The next offset.
    fn offset(&mut self) -> f64;
}

/// Uniform jitter from a seeded `StdRng`.
pub struct SeededJitter(Uniform<f64>, StdRng);

impl SeededJitter {
    /// A generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        SeededJitter(Uniform::new(0.0_f64, 1.0), StdRng::seed_from_u64(seed))
    }
}

impl Jitter for SeededJitter {
    #[inline]
    fn offset(&mut self) -> f64 {
        self.0.sample(&mut self.1)
    }
}

/// The classic 13/7/17 xorshift.  Cheap, and good enough to scatter
/// samples inside a pixel.
pub struct XorShift(u64);

impl XorShift {
    /// A generator seeded with `seed`.  Xorshift is stuck forever at
    /// zero, so a zero seed is nudged.
    pub fn new(seed: u64) -> Self {
        XorShift(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    /// The next raw 64 bits.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

impl Jitter for XorShift {
    #[inline]
    fn offset(&mut self) -> f64 {
        // The top 53 bits fill an f64 mantissa exactly, keeping us below 1.0.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// The same offset every time.  Zero samples the pixel's corner,
/// one half its centre.
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    #[inline]
    fn offset(&mut self) -> f64 {
        self.0
    }
}

/// Which jitter source a render uses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JitterMode {
    /// `StdRng`, seeded per row.
    Random,
    /// Xorshift, seeded per row.
    XorShift,
    /// A constant offset; no randomness at all.
    Fixed(f64),
}

/// SplitMix64 finaliser; spreads neighbouring row seeds apart.
fn mix(seed: u64, row: usize) -> u64 {
    let mut z = seed.wrapping_add((row as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl JitterMode {
    /// The generator for one row of the image.
    pub fn for_row(self, seed: u64, row: usize) -> Box<dyn Jitter> {
        match self {
            JitterMode::Random => Box::new(SeededJitter::new(mix(seed, row))),
            JitterMode::XorShift => Box::new(XorShift::new(mix(seed, row))),
            JitterMode::Fixed(v) => Box::new(FixedJitter(v)),
        }
    }
}

impl FromStr for JitterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(JitterMode::Random),
            "xorshift" => Ok(JitterMode::XorShift),
            "none" => Ok(JitterMode::Fixed(0.0)),
            "center" | "centre" => Ok(JitterMode::Fixed(0.5)),
            _ => Err(format!("Unknown jitter mode '{}'", s)),
        }
    }
}
