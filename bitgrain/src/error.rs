use crate::header::HEADER_LEN;
use thiserror::Error;

/// Error produced by the safe wrappers around the Bitgrain codec.
///
/// Every variant is detected at the binding boundary; the native ABI itself only reports
/// a bare success/failure status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller-supplied buffer or dimensions rejected before any native call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Encoded stream is shorter than the fixed `.bg` header.
    #[error("truncated header: {len} bytes, need at least {HEADER_LEN}")]
    TruncatedHeader { len: usize },

    /// Header dimensions imply a zero-byte destination buffer.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Required buffer size does not fit the native `u32` capacity field.
    #[error("buffer of {requested} bytes exceeds the native capacity limit")]
    CapacityOverflow { requested: u128 },

    /// Destination buffer could not be allocated, or is larger than
    /// [`Config::max_buffer`](crate::Config::max_buffer) allows.
    #[error("could not allocate a {bytes}-byte buffer")]
    AllocationFailed { bytes: usize },

    /// Native call returned a nonzero status.
    #[error("native codec failed with status {status}")]
    NativeFailure { status: i32 },

    /// Native call reported success with an impossible length or channel count.
    #[error("native codec reported an inconsistent result: {0}")]
    CorruptStatus(String),

    /// Stream does not start with `BG`.
    #[error("bad magic {0:02x?}, expected \"BG\"")]
    BadMagic([u8; 2]),

    /// Header carries a version the codec does not define.
    #[error("unsupported .bg version {0}")]
    UnsupportedVersion(u8),

    /// Offloaded call did not finish before its deadline. The native call keeps running.
    #[error("native call did not finish before the deadline")]
    TimedOut,

    /// Offload worker could not be spawned or exited without sending a result.
    #[error("native worker thread exited without a result")]
    WorkerLost,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptStatus(msg.into())
    }
}

pub(crate) fn check(status: i32) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(Error::NativeFailure { status })
    }
}
