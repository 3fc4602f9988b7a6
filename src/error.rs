//! Driver error type.

use thiserror_no_std::Error;

/// Error from a driver operation.
///
/// There is exactly one failure kind: the underlying bus transaction failed
/// (device did not acknowledge, arbitration lost, transport error). The
/// driver never retries; the caller decides whether to retry, abort, or
/// ignore.
///
/// Reads return `Result<u8, Error<E>>` rather than filling an out-parameter,
/// so a failed read cannot leave a stale value that might be mistaken for
/// device data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I²C bus transaction failed.
    #[error("I2C bus transaction failed")]
    I2c(#[from] E),
}
