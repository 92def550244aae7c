//! Turns raw native outcomes into caller-facing results. A buffer only leaves this
//! module trimmed to the length the codec vouched for, and never longer than it was
//! allocated.

use crate::error::{Error, Result, check};
use crate::types::{DecodeStatus, DecodedImage, EncodeStatus, PixelLayout, raw_len};

pub(crate) fn finish_encode(mut buf: Vec<u8>, status: EncodeStatus) -> Result<Vec<u8>> {
    check(status.status)?;
    let len = usize::try_from(status.out_len)
        .map_err(|_| Error::corrupt(format!("negative output length {}", status.out_len)))?;
    if len > buf.len() {
        return Err(Error::corrupt(format!(
            "output length {len} exceeds capacity {}",
            buf.len()
        )));
    }
    buf.truncate(len);
    Ok(buf)
}

pub(crate) fn finish_decode(mut buf: Vec<u8>, status: DecodeStatus) -> Result<DecodedImage> {
    check(status.status)?;
    let DecodeStatus {
        width,
        height,
        channels,
        ..
    } = status;
    let layout = PixelLayout::from_channels(channels)
        .ok_or_else(|| Error::corrupt(format!("channel count {channels}")))?;
    if width == 0 || height == 0 {
        return Err(Error::corrupt(format!("decoded size {width}x{height}")));
    }
    let len = raw_len(width, height, layout.bytes_per_pixel())
        .filter(|&len| len <= buf.len())
        .ok_or_else(|| {
            Error::corrupt(format!(
                "{width}x{height}x{channels} does not fit capacity {}",
                buf.len()
            ))
        })?;
    buf.truncate(len);
    Ok(DecodedImage {
        pixels: buf,
        width,
        height,
        channels,
    })
}
