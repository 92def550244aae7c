//! Fixed-layout `.bg` header.
//!
//! ```text
//! offset  size  field
//!      0     2  magic "BG"
//!      2     1  version (1 gray, 2 rgb, 3 rgba)
//!      3     4  width, little-endian
//!      7     4  height, little-endian
//!     11     1  quality
//!     12     -  coded payload
//! ```
//!
//! RGB and RGBA streams may end with an ICC trailer: `"BGx"`, chunk type `1`, the
//! profile length as a little-endian `u32`, then the profile bytes. Only the native
//! decoder locates it, since the payload length is not recorded anywhere.

use crate::error::{Error, Result};
use crate::types::{PixelLayout, raw_len_wide};

/// Bytes every stream must hold before the binding reads it.
pub const HEADER_LEN: usize = 12;
pub const MAGIC: [u8; 2] = *b"BG";

/// Bytes the native encoder adds in front of an embedded ICC profile.
pub const ICC_TRAILER_OVERHEAD: usize = 8;

const VERSION_OFFSET: usize = 2;
const WIDTH_OFFSET: usize = 3;
const HEIGHT_OFFSET: usize = 7;
const QUALITY_OFFSET: usize = 11;

/// Channel count used to size decode buffers before the real one is known.
pub(crate) const MAX_CHANNELS: usize = 4;

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Read `(width, height)` without checking magic or version; the native decoder
/// validates those.
pub fn prescan(stream: &[u8]) -> Result<(u32, u32)> {
    if stream.len() < HEADER_LEN {
        return Err(Error::TruncatedHeader { len: stream.len() });
    }
    Ok((
        read_u32_le(stream, WIDTH_OFFSET),
        read_u32_le(stream, HEIGHT_OFFSET),
    ))
}

/// Destination size for a decode of `width x height` with `channels` samples per pixel.
pub(crate) fn decode_capacity(width: u32, height: u32, channels: usize) -> Result<usize> {
    let requested = raw_len_wide(width, height, channels);
    if requested == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if requested > u32::MAX as u128 {
        return Err(Error::CapacityOverflow { requested });
    }
    Ok(requested as usize)
}

/// Fully validated header, for tooling that inspects streams without decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub layout: PixelLayout,
    pub width: u32,
    pub height: u32,
    /// Informational; `0` in older streams means the codec default.
    pub quality: u8,
}

impl Header {
    pub fn new(layout: PixelLayout, width: u32, height: u32, quality: u8) -> Self {
        Self {
            layout,
            width,
            height,
            quality,
        }
    }

    pub fn parse(stream: &[u8]) -> Result<Self> {
        let (width, height) = prescan(stream)?;
        let magic = [stream[0], stream[1]];
        if magic != MAGIC {
            return Err(Error::BadMagic(magic));
        }
        let version = stream[VERSION_OFFSET];
        let layout =
            PixelLayout::from_version(version).ok_or(Error::UnsupportedVersion(version))?;
        Ok(Self {
            layout,
            width,
            height,
            quality: stream[QUALITY_OFFSET],
        })
    }

    pub fn version(&self) -> u8 {
        self.layout.version()
    }

    pub fn channels(&self) -> u32 {
        self.layout.channels()
    }

    /// Size of the pixel buffer this stream decodes to.
    pub fn decoded_len(&self) -> u128 {
        raw_len_wide(self.width, self.height, self.layout.bytes_per_pixel())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..2].copy_from_slice(&MAGIC);
        out[VERSION_OFFSET] = self.version();
        out[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&self.width.to_le_bytes());
        out[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&self.height.to_le_bytes());
        out[QUALITY_OFFSET] = self.quality;
        out
    }
}
