//! Moduli and their unbiased thresholds.

use core::{fmt, num::NonZeroU64};

use crate::error::RangeError;

/// The size of the entropy source's output space: 2^32.
pub const ENTROPY_SPACE: u64 = 1 << 32;

/// The default integer range.
pub const DEFAULT_RANGE: u64 = 0x7FFF;

/// The exclusive upper bound of a uniform range `[0, M)`.
///
/// A `Modulus` is never zero.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Modulus(NonZeroU64);

impl Modulus {
    /// The default integer range, `0x7FFF`.
    pub const DEFAULT: Self = Self::new_const(DEFAULT_RANGE);
    /// The number of lowercase ASCII letters.
    pub const LETTERS: Self = Self::new_const(26);
    /// The number of decimal digits.
    pub const DIGITS: Self = Self::new_const(10);
    /// The widest modulus that is still sampled without bias.
    pub const MAX_EXACT: Self = Self::new_const(ENTROPY_SPACE);

    /// Creates a modulus, or `None` if `n` is zero.
    pub const fn new(n: u64) -> Option<Self> {
        match NonZeroU64::new(n) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    #[allow(clippy::panic)] // only evaluated at compile time
    const fn new_const(n: u64) -> Self {
        match Self::new(n) {
            Some(m) => m,
            None => panic!("modulus must be non-zero"),
        }
    }

    /// Returns the modulus as a `u64`.
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Returns the modulus as a [`NonZeroU64`].
    pub const fn as_nonzero(self) -> NonZeroU64 {
        self.0
    }

    /// Reports how uniform samples over this modulus are.
    pub const fn uniformity(self) -> Uniformity {
        if self.get() > ENTROPY_SPACE {
            Uniformity::Partial
        } else {
            Uniformity::Exact
        }
    }
}

impl Default for Modulus {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<NonZeroU64> for Modulus {
    fn from(n: NonZeroU64) -> Self {
        Self(n)
    }
}

impl From<Modulus> for u64 {
    fn from(m: Modulus) -> Self {
        m.get()
    }
}

impl TryFrom<u64> for Modulus {
    type Error = RangeError;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        Self::new(n).ok_or(RangeError::OutOfRange)
    }
}

impl TryFrom<u32> for Modulus {
    type Error = RangeError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::try_from(u64::from(n))
    }
}

impl TryFrom<i128> for Modulus {
    type Error = RangeError;

    fn try_from(n: i128) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .map_err(|_| RangeError::OutOfRange)
            .and_then(Self::try_from)
    }
}

impl TryFrom<i64> for Modulus {
    type Error = RangeError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::try_from(i128::from(n))
    }
}

impl TryFrom<i32> for Modulus {
    type Error = RangeError;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        Self::try_from(i128::from(n))
    }
}

impl TryFrom<f64> for Modulus {
    type Error = RangeError;

    /// Fractional values, NaN, and infinities are rejected rather
    /// than truncated.
    fn try_from(n: f64) -> Result<Self, Self::Error> {
        // Every float with a magnitude of at least 2^53 is an
        // integer.
        const EXACT: f64 = 9_007_199_254_740_992.0;
        // 2^64 as a float.
        const LIMIT: f64 = 18_446_744_073_709_551_616.0;

        if !n.is_finite() {
            return Err(RangeError::InvalidType);
        }
        // `n` is finite and below 2^53 in magnitude, so the round
        // trip through `i64` only drops a fractional part.
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let fractional = (-EXACT..EXACT).contains(&n) && (n as i64) as f64 != n;
        if fractional {
            return Err(RangeError::InvalidType);
        }
        if !(1.0..LIMIT).contains(&n) {
            return Err(RangeError::OutOfRange);
        }
        // `n` is an integer in [1, 2^64), so the cast is exact.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as u64;
        Self::try_from(n)
    }
}

impl TryFrom<&str> for Modulus {
    type Error = RangeError;

    /// Always fails: a range is a number, never text, even text
    /// that spells one.
    fn try_from(_: &str) -> Result<Self, Self::Error> {
        Err(RangeError::InvalidType)
    }
}

/// How uniform samples over a [`Modulus`] are.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Uniformity {
    /// Every value in `[0, M)` is equally likely.
    Exact,
    /// `M` exceeds [`ENTROPY_SPACE`]. Each sample takes a single
    /// draw, so only `[0, 2^32)` is reachable.
    Partial,
}

/// Returns the largest multiple of `modulus` that does not exceed
/// [`ENTROPY_SPACE`].
///
/// Draws at or above the threshold are rejected. The result is zero
/// iff `modulus > 2^32`.
pub const fn unbiased_threshold(modulus: Modulus) -> u64 {
    let m = modulus.get();
    // `m` is non-zero and the product is at most 2^32.
    ENTROPY_SPACE.wrapping_div(m).wrapping_mul(m)
}
