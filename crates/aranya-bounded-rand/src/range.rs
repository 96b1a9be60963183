//! The configurable integer range.

use core::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::{
    error::RangeError,
    modulus::{Modulus, Uniformity},
};

/// The state of a [`RangeConfig`].
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum RangeState {
    /// Never configured; the range is [`Modulus::DEFAULT`].
    Default,
    /// Configured with this modulus. There is no way back to
    /// [`RangeState::Default`].
    Configured(Modulus),
}

impl RangeState {
    /// Returns the modulus in effect.
    pub const fn modulus(self) -> Modulus {
        match self {
            Self::Default => Modulus::DEFAULT,
            Self::Configured(m) => m,
        }
    }
}

/// Holds the modulus used by
/// [`Generator::random_int`][crate::Generator::random_int].
///
/// It starts at [`Modulus::DEFAULT`] and only changes through
/// [`set`][Self::set]. The whole state lives in one atomic, so a
/// reader never observes a partially applied update.
#[derive(Debug)]
pub struct RangeConfig {
    // Zero is never a valid modulus, so it marks the default state.
    modulus: AtomicU64,
}

impl RangeConfig {
    /// Creates a config in [`RangeState::Default`].
    pub const fn new() -> Self {
        Self {
            modulus: AtomicU64::new(0),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> RangeState {
        match Modulus::new(self.modulus.load(Ordering::Acquire)) {
            Some(m) => RangeState::Configured(m),
            None => RangeState::Default,
        }
    }

    /// Returns the current modulus.
    pub fn get(&self) -> Modulus {
        self.state().modulus()
    }

    /// Reports whether [`set`][Self::set] has been called.
    pub fn is_configured(&self) -> bool {
        matches!(self.state(), RangeState::Configured(_))
    }

    /// Validates `value` and stores it.
    ///
    /// On error the current modulus is left unchanged.
    pub fn try_set<V>(&self, value: V) -> Result<Uniformity, RangeError>
    where
        V: TryInto<Modulus, Error = RangeError>,
    {
        let modulus = value.try_into().inspect_err(|err| {
            debug!("rejected range: {err}");
        })?;
        Ok(self.set(modulus))
    }

    /// Stores `modulus`.
    ///
    /// Moduli wider than 2^32 are accepted, but samples then only
    /// cover `[0, 2^32)`. A warning is logged and
    /// [`Uniformity::Partial`] is returned.
    pub fn set(&self, modulus: Modulus) -> Uniformity {
        let uniformity = modulus.uniformity();
        if uniformity == Uniformity::Partial {
            warn!(
                %modulus,
                "range exceeds 2^32: uniformity is only guaranteed up to 2^32"
            );
        }
        self.modulus.store(modulus.get(), Ordering::Release);
        debug!(%modulus, "range updated");
        uniformity
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self::new()
    }
}
