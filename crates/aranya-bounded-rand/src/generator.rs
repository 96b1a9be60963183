use crate::{
    entropy::{Entropy, EntropySource, Strategy},
    error::RangeError,
    modulus::{Modulus, Uniformity, unbiased_threshold},
    range::RangeConfig,
    sampler::{sample_below, sample_uniform},
};

const LETTER_THRESHOLD: u64 = unbiased_threshold(Modulus::LETTERS);
const DIGIT_THRESHOLD: u64 = unbiased_threshold(Modulus::DIGITS);

/// Generates unbiased bounded integers, letters, and digits.
///
/// Each generator owns its entropy source and its integer range,
/// so independent generators never interfere with each other.
#[derive(Debug)]
pub struct Generator<R = Entropy> {
    rng: R,
    range: RangeConfig,
}

impl Generator<Entropy> {
    /// Creates a generator backed by [`Entropy::detect`].
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_source(Entropy::detect())
    }

    /// Returns the strategy chosen when the generator was created.
    pub const fn strategy(&self) -> Strategy {
        self.rng.strategy()
    }
}

#[cfg(feature = "std")]
impl Default for Generator<Entropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EntropySource> Generator<R> {
    /// Creates a generator that draws from `rng`.
    pub const fn with_source(rng: R) -> Self {
        Self {
            rng,
            range: RangeConfig::new(),
        }
    }

    /// Returns the underlying entropy source.
    pub const fn source(&self) -> &R {
        &self.rng
    }

    /// Returns one raw 32-bit draw.
    pub fn random_base(&self) -> u32 {
        self.rng.next_u32()
    }

    /// Returns an integer in `[0, range())`.
    ///
    /// The range is read on every call.
    pub fn random_int(&self) -> u64 {
        sample_uniform(&self.rng, self.range.get())
    }

    /// Returns a lowercase ASCII letter.
    pub fn random_letter(&self) -> char {
        let n = sample_below(&self.rng, Modulus::LETTERS, LETTER_THRESHOLD);
        offset_char(b'a', n)
    }

    /// Returns a decimal digit.
    pub fn random_digit(&self) -> char {
        let n = sample_below(&self.rng, Modulus::DIGITS, DIGIT_THRESHOLD);
        offset_char(b'0', n)
    }

    /// Sets the range used by [`random_int`][Self::random_int].
    ///
    /// # Errors
    ///
    /// - [`RangeError::InvalidType`] if `value` is not an integer.
    /// - [`RangeError::OutOfRange`] if `value` is less than one or
    ///   does not fit in a `u64`.
    ///
    /// The range is unchanged if an error is returned. Ranges wider
    /// than 2^32 succeed with [`Uniformity::Partial`].
    pub fn set_range<V>(&self, value: V) -> Result<Uniformity, RangeError>
    where
        V: TryInto<Modulus, Error = RangeError>,
    {
        self.range.try_set(value)
    }

    /// Like [`set_range`][Self::set_range], but for an already
    /// validated modulus.
    pub fn set_modulus(&self, modulus: Modulus) -> Uniformity {
        self.range.set(modulus)
    }

    /// Returns the range used by [`random_int`][Self::random_int].
    pub fn range(&self) -> Modulus {
        self.range.get()
    }

    /// Returns the range configuration.
    pub const fn range_config(&self) -> &RangeConfig {
        &self.range
    }
}

/// Returns the character `n` places after `base`.
fn offset_char(base: u8, n: u64) -> char {
    // `n` is below 26, so it fits in a `u8` without wrapping.
    #[allow(clippy::cast_possible_truncation)]
    let n = n as u8;
    char::from(base.wrapping_add(n))
}
