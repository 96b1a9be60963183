//! Unbiased bounded random values from a 32-bit entropy source.
//!
//! Reducing a random `u32` modulo `M` favors small values whenever
//! `M` does not divide 2^32. This crate removes that bias with
//! rejection sampling (see [`sampler`]).
//!
//! # Entropy
//!
//! [`Entropy::detect`] probes the operating system's CSPRNG once.
//! If it is unavailable, a non-secure [`FallbackSource`] is used
//! instead. The choice never changes afterwards. This is *not* a
//! certified CSPRNG: the fallback is silent apart from a `debug`
//! log.
//!
//! # Ranges
//!
//! Letters and digits have fixed ranges. The range used by
//! [`Generator::random_int`] defaults to `0x7FFF` and can be changed
//! with [`Generator::set_range`]. Ranges wider than 2^32 are
//! accepted, but each sample then takes a single draw and only
//! `[0, 2^32)` is reachable.
//!
//! # Example
//!
//! ```
//! use aranya_bounded_rand::{Generator, RangeError, Uniformity};
//!
//! let rng = Generator::new();
//!
//! assert_eq!(rng.set_range(100), Ok(Uniformity::Exact));
//! assert!(rng.random_int() < 100);
//! assert!(rng.random_letter().is_ascii_lowercase());
//! assert!(rng.random_digit().is_ascii_digit());
//!
//! assert_eq!(rng.set_range(0), Err(RangeError::OutOfRange));
//! assert_eq!(rng.set_range("x"), Err(RangeError::InvalidType));
//! assert_eq!(rng.range().get(), 100);
//! ```
//!
//! The free functions in this crate share one process-wide
//! [`Generator`]:
//!
//! ```
//! let c = aranya_bounded_rand::random_letter();
//! assert!(c.is_ascii_lowercase());
//! ```

#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod entropy;
mod error;
mod generator;
pub mod modulus;
mod range;
pub mod sampler;

#[cfg(feature = "std")]
use spin::Lazy;

pub use crate::{
    entropy::{Entropy, EntropySource, FallbackSource, OsSource, RngSource, Strategy},
    error::RangeError,
    generator::Generator,
    modulus::{DEFAULT_RANGE, ENTROPY_SPACE, Modulus, Uniformity, unbiased_threshold},
    range::{RangeConfig, RangeState},
    sampler::sample_uniform,
};

#[cfg(feature = "std")]
static GLOBAL: Lazy<Generator> = Lazy::new(Generator::new);

#[cfg(feature = "std")]
/// Returns the process-wide [`Generator`].
///
/// Its entropy source is selected on first use.
pub fn global() -> &'static Generator {
    &GLOBAL
}

#[cfg(feature = "std")]
/// See [`Generator::random_base`].
pub fn random_base() -> u32 {
    global().random_base()
}

#[cfg(feature = "std")]
/// See [`Generator::random_int`].
pub fn random_int() -> u64 {
    global().random_int()
}

#[cfg(feature = "std")]
/// See [`Generator::random_letter`].
pub fn random_letter() -> char {
    global().random_letter()
}

#[cfg(feature = "std")]
/// See [`Generator::random_digit`].
pub fn random_digit() -> char {
    global().random_digit()
}

#[cfg(feature = "std")]
/// See [`Generator::set_range`].
pub fn set_range<V>(value: V) -> Result<Uniformity, RangeError>
where
    V: TryInto<Modulus, Error = RangeError>,
{
    global().set_range(value)
}

#[cfg(feature = "std")]
/// See [`Generator::range`].
pub fn range() -> Modulus {
    global().range()
}

#[cfg(feature = "std")]
/// Returns the strategy of the process-wide [`Generator`].
pub fn strategy() -> Strategy {
    global().strategy()
}
