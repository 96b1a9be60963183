/// An invalid integer range.
///
/// Returned by [`Generator::set_range`][crate::Generator::set_range]
/// and the [`Modulus`][crate::Modulus] conversions. The stored range
/// is never modified when this is returned.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RangeError {
    /// The value is not an integer.
    #[error("range must be an integer")]
    InvalidType,
    /// The value is less than one or does not fit in a `u64`.
    #[error("range must be within [1, 2^64)")]
    OutOfRange,
}
