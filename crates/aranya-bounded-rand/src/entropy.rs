//! Entropy sources.
//!
//! The generator only ever asks for one 32-bit value at a time.
//! [`Entropy`] decides once whether that value comes from the
//! operating system's CSPRNG or from a non-secure fallback.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::{
    process,
    time::{SystemTime, UNIX_EPOCH},
};

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_core::{OsRng, RngCore};
use spin::Mutex;
use tracing::debug;

/// A source of 32-bit random values.
pub trait EntropySource {
    /// Returns one uniformly random `u32`.
    ///
    /// # Error Handling
    ///
    /// If the underlying source encounters a fatal error, it
    /// must immediately panic or abort the program.
    fn next_u32(&self) -> u32;
}

impl<R: EntropySource + ?Sized> EntropySource for &R {
    fn next_u32(&self) -> u32 {
        (**self).next_u32()
    }
}

impl<R: EntropySource + ?Sized> EntropySource for &mut R {
    fn next_u32(&self) -> u32 {
        (**self).next_u32()
    }
}

#[cfg(feature = "alloc")]
impl<R: EntropySource + ?Sized> EntropySource for Box<R> {
    fn next_u32(&self) -> u32 {
        (**self).next_u32()
    }
}

/// The operating system's CSPRNG.
#[derive(Copy, Clone, Debug, Default)]
pub struct OsSource;

impl OsSource {
    /// Reports whether the OS CSPRNG can currently be read.
    pub fn is_available() -> bool {
        let mut probe = [0u8; 4];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => true,
            Err(err) => {
                debug!("OS CSPRNG unavailable: {err}");
                false
            }
        }
    }
}

impl EntropySource for OsSource {
    fn next_u32(&self) -> u32 {
        let mut buf = [0u8; 4];
        // Panics if the OS CSPRNG fails after it was probed.
        OsRng.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }
}

/// A non-secure source used when the OS CSPRNG is missing.
///
/// Each draw scales a uniform `f64` in `[0, 1)` by 2^32 and
/// truncates toward zero.
#[derive(Debug)]
pub struct FallbackSource {
    rng: Mutex<SmallRng>,
}

impl FallbackSource {
    /// Creates a fallback source seeded from the clock and the
    /// process ID.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        #[allow(clippy::cast_possible_truncation)] // only mixing bits
        let seed = (nanos as u64) ^ ((nanos >> 64) as u64);
        Self::from_seed(seed ^ u64::from(process::id()).rotate_left(32))
    }

    /// Creates a fallback source with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

#[cfg(feature = "std")]
impl Default for FallbackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for FallbackSource {
    fn next_u32(&self) -> u32 {
        let unit: f64 = self.rng.lock().r#gen();
        scale_unit(unit)
    }
}

/// Maps `x` in `[0, 1)` onto `[0, 2^32)`.
fn scale_unit(x: f64) -> u32 {
    // 2^32 as a float.
    const SCALE: f64 = 4_294_967_296.0;
    // `as` truncates toward zero and saturates, so out of range
    // inputs still land in `u32`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let v = (x * SCALE) as u32;
    v
}

/// Adapts a [`rand_core::RngCore`] into an [`EntropySource`].
///
/// Mostly useful for injecting seeded generators in tests.
#[derive(Debug)]
pub struct RngSource<R> {
    rng: Mutex<R>,
}

impl<R: RngCore> RngSource<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng.into_inner()
    }
}

impl<R: RngCore> EntropySource for RngSource<R> {
    fn next_u32(&self) -> u32 {
        self.rng.lock().next_u32()
    }
}

/// Which kind of entropy source is in use.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Strategy {
    /// The OS CSPRNG.
    Secure,
    /// The non-secure fallback.
    Fallback,
}

/// An entropy source that was selected once and never changes.
#[derive(Debug)]
pub enum Entropy {
    /// See [`OsSource`].
    Secure(OsSource),
    /// See [`FallbackSource`].
    Fallback(FallbackSource),
}

impl Entropy {
    /// Probes the OS CSPRNG and binds to it if it is available,
    /// falling back to [`FallbackSource`] otherwise.
    #[cfg(feature = "std")]
    pub fn detect() -> Self {
        Self::select(OsSource::is_available)
    }

    /// Like [`detect`][Self::detect], but with a caller supplied
    /// availability probe.
    ///
    /// `probe` runs exactly once.
    #[cfg(feature = "std")]
    pub fn select<F>(probe: F) -> Self
    where
        F: FnOnce() -> bool,
    {
        let entropy = if probe() {
            Self::Secure(OsSource)
        } else {
            Self::Fallback(FallbackSource::new())
        };
        debug!(strategy = ?entropy.strategy(), "selected entropy source");
        entropy
    }

    /// Returns the bound strategy.
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Secure(_) => Strategy::Secure,
            Self::Fallback(_) => Strategy::Fallback,
        }
    }
}

#[cfg(feature = "std")]
impl Default for Entropy {
    fn default() -> Self {
        Self::detect()
    }
}

impl EntropySource for Entropy {
    fn next_u32(&self) -> u32 {
        match self {
            Self::Secure(rng) => rng.next_u32(),
            Self::Fallback(rng) => rng.next_u32(),
        }
    }
}
