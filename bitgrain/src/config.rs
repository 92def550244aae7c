use crate::error::{Error, Result};
use crate::types::zeroed;

/// Largest width or height the native codec accepts.
pub const DEFAULT_MAX_DIMENSION: u32 = 65536;

/// Buffer sizing policy shared by [`Encoder`](crate::Encoder) and
/// [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Destination capacity as a multiple of the raw pixel size. Values below 1.0
    /// are treated as 1.0.
    pub capacity_multiplier: f64,
    /// Smallest destination buffer ever handed to the encoder.
    pub min_capacity: usize,
    /// Retry once with a doubled buffer when the encoder reports failure.
    pub grow_on_failure: bool,
    /// Largest accepted width or height on encode; `None` disables the check.
    pub max_dimension: Option<u32>,
    /// Largest destination buffer either side allocates. Decode sizes come from
    /// untrusted headers, so callers handling foreign streams should set this.
    pub max_buffer: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_multiplier: 2.0,
            min_capacity: 1024,
            grow_on_failure: false,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            max_buffer: None,
        }
    }
}

impl Config {
    pub fn with_capacity_multiplier(mut self, multiplier: f64) -> Self {
        self.capacity_multiplier = multiplier;
        self
    }

    pub fn with_min_capacity(mut self, bytes: usize) -> Self {
        self.min_capacity = bytes;
        self
    }

    pub fn with_grow_on_failure(mut self, enable: bool) -> Self {
        self.grow_on_failure = enable;
        self
    }

    pub fn with_max_dimension(mut self, max: Option<u32>) -> Self {
        self.max_dimension = max;
        self
    }

    pub fn with_max_buffer(mut self, bytes: Option<usize>) -> Self {
        self.max_buffer = bytes;
        self
    }

    /// Destination capacity for `raw_len` bytes of source pixels.
    pub fn encode_capacity(&self, raw_len: usize) -> Result<usize> {
        let multiplier = self.capacity_multiplier.max(1.0);
        // Saturating float->int cast; anything past u32 is rejected below.
        let scaled = (raw_len as f64 * multiplier).ceil() as u64;
        let requested = (scaled as u128).max(self.min_capacity as u128);
        if requested > u32::MAX as u128 {
            return Err(Error::CapacityOverflow { requested });
        }
        Ok(requested as usize)
    }

    /// Capacity for the single retry after a failed encode, or `None` when the
    /// buffer cannot grow any further.
    pub(crate) fn grown_capacity(&self, capacity: usize) -> Option<usize> {
        let grown = capacity.saturating_mul(2).min(u32::MAX as usize);
        (grown > capacity).then_some(grown)
    }

    /// Zeroed destination buffer of `len` bytes, honoring `max_buffer`.
    pub(crate) fn alloc_buffer(&self, len: usize) -> Result<Vec<u8>> {
        if self.max_buffer.is_some_and(|max| len > max) {
            return Err(Error::AllocationFailed { bytes: len });
        }
        zeroed(len)
    }

    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_input(format!(
                "zero dimension {width}x{height}"
            )));
        }
        if let Some(max) = self.max_dimension {
            if width > max || height > max {
                return Err(Error::invalid_input(format!(
                    "{width}x{height} exceeds the {max}px limit"
                )));
            }
        }
        Ok(())
    }
}
