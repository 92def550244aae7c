use crate::error::{Error, Result};

/// Quality byte the native encoder substitutes when it receives `0`.
pub const DEFAULT_QUALITY: u8 = 85;

/// Sample layout of an uncompressed pixel buffer (row-major, 8 bits per sample).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Gray,
    /// R, G, B per pixel.
    Rgb,
    /// R, G, B, A per pixel.
    Rgba,
}

impl PixelLayout {
    pub const ALL: [PixelLayout; 3] = [PixelLayout::Gray, PixelLayout::Rgb, PixelLayout::Rgba];

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn channels(self) -> u32 {
        self.bytes_per_pixel() as u32
    }

    pub fn from_channels(channels: u32) -> Option<Self> {
        match channels {
            1 => Some(PixelLayout::Gray),
            3 => Some(PixelLayout::Rgb),
            4 => Some(PixelLayout::Rgba),
            _ => None,
        }
    }

    /// Header version byte the native encoder writes for this layout.
    pub fn version(self) -> u8 {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb => 2,
            PixelLayout::Rgba => 3,
        }
    }

    pub fn from_version(version: u8) -> Option<Self> {
        match version {
            1 => Some(PixelLayout::Gray),
            2 => Some(PixelLayout::Rgb),
            3 => Some(PixelLayout::Rgba),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelLayout::Gray => "gray",
            PixelLayout::Rgb => "rgb",
            PixelLayout::Rgba => "rgba",
        }
    }
}

/// Pixels produced by the native decoder, trimmed to exactly
/// `width * height * channels` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl DecodedImage {
    pub fn layout(&self) -> Option<PixelLayout> {
        PixelLayout::from_channels(self.channels)
    }

    pub fn row(&self, y: u32) -> Result<&[u8]> {
        if y >= self.height {
            return Err(Error::invalid_input("row out of range"));
        }
        let row_bytes = self.width as usize * self.channels as usize;
        let start = y as usize * row_bytes;
        self.pixels
            .get(start..start + row_bytes)
            .ok_or_else(|| Error::invalid_input("row outside pixel buffer"))
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Raw outcome of one native encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStatus {
    /// `0` on success.
    pub status: i32,
    /// Bytes written into the destination buffer.
    pub out_len: i32,
}

impl EncodeStatus {
    pub fn ok(out_len: i32) -> Self {
        Self { status: 0, out_len }
    }

    pub fn failed(status: i32) -> Self {
        Self { status, out_len: 0 }
    }
}

/// Raw outcome of one native decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeStatus {
    /// `0` on success.
    pub status: i32,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl DecodeStatus {
    pub fn ok(width: u32, height: u32, channels: u32) -> Self {
        Self {
            status: 0,
            width,
            height,
            channels,
        }
    }

    pub fn failed(status: i32) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// `width * height * bytes_per_pixel`, or `None` if it does not fit `usize`.
pub(crate) fn raw_len(width: u32, height: u32, bytes_per_pixel: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(bytes_per_pixel))
}

/// Zero-filled buffer of `len` bytes; failure to reserve is an error, not an abort.
pub(crate) fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

pub(crate) fn raw_len_wide(width: u32, height: u32, bytes_per_pixel: usize) -> u128 {
    width as u128 * height as u128 * bytes_per_pixel as u128
}
