//! Seam between the safe wrappers and the codec that actually does the work.
//!
//! Implementations receive buffers that have already been validated and sized:
//! `src` holds exactly `width * height * bpp` bytes on encode and `dst` is the
//! full destination capacity. They report raw native results; interpreting them is
//! left to the caller.
//!
//! Calls may arrive from any thread at once, each with its own buffers, so backends
//! are `Send + Sync`.

use crate::types::{DecodeStatus, EncodeStatus, PixelLayout};
use std::sync::Arc;

pub trait NativeEncoder: Send + Sync {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus;

    /// Encode and append `icc` as a profile trailer. Only RGB and RGBA layouts reach
    /// this. Backends that cannot embed profiles report failure.
    #[allow(clippy::too_many_arguments)]
    fn encode_with_icc(
        &self,
        _layout: PixelLayout,
        _src: &[u8],
        _width: u32,
        _height: u32,
        _dst: &mut [u8],
        _quality: u8,
        _icc: &[u8],
    ) -> EncodeStatus {
        EncodeStatus::failed(-1)
    }
}

pub trait NativeDecoder: Send + Sync {
    /// Decode into `dst`, reporting the stream's real dimensions and channel count.
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus;

    /// Decode a grayscale stream. Backends without a dedicated entry point fall back
    /// to [`NativeDecoder::decode`] and reject anything that is not single-channel.
    fn decode_grayscale(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        let status = self.decode(src, dst);
        if status.status == 0 && status.channels != 1 {
            return DecodeStatus::failed(-1);
        }
        status
    }

    /// Decode and return the embedded ICC profile, copied into owned memory.
    /// Backends that do not read profiles report none.
    fn decode_with_icc(&self, src: &[u8], dst: &mut [u8]) -> (DecodeStatus, Option<Vec<u8>>) {
        (self.decode(src, dst), None)
    }
}

impl<T: NativeEncoder + ?Sized> NativeEncoder for &T {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus {
        (**self).encode(layout, src, width, height, dst, quality)
    }

    fn encode_with_icc(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
        icc: &[u8],
    ) -> EncodeStatus {
        (**self).encode_with_icc(layout, src, width, height, dst, quality, icc)
    }
}

impl<T: NativeEncoder + ?Sized> NativeEncoder for Arc<T> {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus {
        (**self).encode(layout, src, width, height, dst, quality)
    }

    fn encode_with_icc(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
        icc: &[u8],
    ) -> EncodeStatus {
        (**self).encode_with_icc(layout, src, width, height, dst, quality, icc)
    }
}

impl<T: NativeDecoder + ?Sized> NativeDecoder for &T {
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        (**self).decode(src, dst)
    }

    fn decode_grayscale(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        (**self).decode_grayscale(src, dst)
    }

    fn decode_with_icc(&self, src: &[u8], dst: &mut [u8]) -> (DecodeStatus, Option<Vec<u8>>) {
        (**self).decode_with_icc(src, dst)
    }
}

impl<T: NativeDecoder + ?Sized> NativeDecoder for Arc<T> {
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        (**self).decode(src, dst)
    }

    fn decode_grayscale(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        (**self).decode_grayscale(src, dst)
    }

    fn decode_with_icc(&self, src: &[u8], dst: &mut [u8]) -> (DecodeStatus, Option<Vec<u8>>) {
        (**self).decode_with_icc(src, dst)
    }
}
