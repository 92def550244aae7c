use crate::backend::{NativeDecoder, NativeEncoder};
use crate::config::DEFAULT_MAX_DIMENSION;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::header::{HEADER_LEN, ICC_TRAILER_OVERHEAD};
use crate::sys;
use crate::types::{DecodeStatus, EncodeStatus, PixelLayout};
use std::os::raw::c_int;
use std::ptr::{self, NonNull};

// The safe layer sizes buffers and checks statuses with its own copies of these.
const _: () = assert!(sys::BITGRAIN_OK == 0);
const _: () = assert!(sys::BITGRAIN_HEADER_LEN == HEADER_LEN);
const _: () = assert!(sys::BITGRAIN_ICC_TRAILER_LEN == ICC_TRAILER_OVERHEAD);
const _: () = assert!(sys::BITGRAIN_MAX_DIM == DEFAULT_MAX_DIMENSION);

type EncodeFn = unsafe extern "C" fn(*const u8, u32, u32, *mut u8, u32, *mut i32, u8) -> c_int;
type EncodeIccFn =
    unsafe extern "C" fn(*const u8, u32, u32, *mut u8, u32, *mut i32, u8, *const u8, u32) -> c_int;

/// ICC profile allocated by the native decoder, released on drop.
struct NativeIcc {
    ptr: NonNull<u8>,
    len: u32,
}

impl NativeIcc {
    fn to_vec(&self) -> Vec<u8> {
        // SAFETY: the library handed out `ptr` valid for `len` bytes and keeps it alive
        // until `bitgrain_free_icc`, which only runs in `drop`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len as usize) }.to_vec()
    }
}

impl Drop for NativeIcc {
    fn drop(&mut self) {
        // SAFETY: pointer and length are exactly what `bitgrain_decode_icc` returned.
        unsafe { sys::bitgrain_free_icc(self.ptr.as_ptr(), self.len) };
    }
}

/// Backend linked against the native Bitgrain library.
///
/// The library keeps no global state, so one value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bitgrain;

impl Bitgrain {
    pub fn encoder() -> Encoder<Bitgrain> {
        Encoder::new(Bitgrain)
    }

    pub fn decoder() -> Decoder<Bitgrain> {
        Decoder::new(Bitgrain)
    }
}

impl NativeEncoder for Bitgrain {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus {
        let Ok(capacity) = u32::try_from(dst.len()) else {
            return EncodeStatus::failed(-1);
        };
        if src.len() < width as usize * height as usize * layout.bytes_per_pixel() {
            return EncodeStatus::failed(-1);
        }
        let entry: EncodeFn = match layout {
            PixelLayout::Gray => sys::bitgrain_encode_grayscale,
            PixelLayout::Rgb => sys::bitgrain_encode_rgb,
            PixelLayout::Rgba => sys::bitgrain_encode_rgba,
        };
        let mut out_len: i32 = 0;
        // SAFETY: src holds width*height*bpp bytes (checked above), dst is valid for
        // `capacity` writes, and both outlive the call; the library retains no pointers.
        let status = unsafe {
            entry(
                src.as_ptr(),
                width,
                height,
                dst.as_mut_ptr(),
                capacity,
                &mut out_len,
                quality,
            )
        };
        EncodeStatus {
            status: status as i32,
            out_len,
        }
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
        let (Ok(capacity), Ok(icc_len)) = (u32::try_from(dst.len()), u32::try_from(icc.len()))
        else {
            return EncodeStatus::failed(-1);
        };
        if src.len() < width as usize * height as usize * layout.bytes_per_pixel() {
            return EncodeStatus::failed(-1);
        }
        let entry: EncodeIccFn = match layout {
            PixelLayout::Gray => return EncodeStatus::failed(-1),
            PixelLayout::Rgb => sys::bitgrain_encode_rgb_icc,
            PixelLayout::Rgba => sys::bitgrain_encode_rgba_icc,
        };
        let mut out_len: i32 = 0;
        // SAFETY: as in `encode`; `icc` is a live slice of `icc_len` bytes.
        let status = unsafe {
            entry(
                src.as_ptr(),
                width,
                height,
                dst.as_mut_ptr(),
                capacity,
                &mut out_len,
                quality,
                icc.as_ptr(),
                icc_len,
            )
        };
        EncodeStatus {
            status: status as i32,
            out_len,
        }
    }
}

impl NativeDecoder for Bitgrain {
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        let (Ok(size), Ok(capacity)) = (i32::try_from(src.len()), u32::try_from(dst.len())) else {
            return DecodeStatus::failed(-1);
        };
        let (mut width, mut height, mut channels) = (0u32, 0u32, 0u32);
        // SAFETY: pointer/length pairs come from live slices; out-params are locals.
        let status = unsafe {
            sys::bitgrain_decode(
                src.as_ptr(),
                size,
                dst.as_mut_ptr(),
                capacity,
                &mut width,
                &mut height,
                &mut channels,
            )
        };
        DecodeStatus {
            status: status as i32,
            width,
            height,
            channels,
        }
    }

    fn decode_grayscale(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        let (Ok(size), Ok(capacity)) = (i32::try_from(src.len()), u32::try_from(dst.len())) else {
            return DecodeStatus::failed(-1);
        };
        let (mut width, mut height) = (0u32, 0u32);
        // SAFETY: as in `decode`.
        let status = unsafe {
            sys::bitgrain_decode_grayscale(
                src.as_ptr(),
                size,
                dst.as_mut_ptr(),
                capacity,
                &mut width,
                &mut height,
            )
        };
        DecodeStatus {
            status: status as i32,
            width,
            height,
            channels: 1,
        }
    }

    fn decode_with_icc(&self, src: &[u8], dst: &mut [u8]) -> (DecodeStatus, Option<Vec<u8>>) {
        let (Ok(size), Ok(capacity)) = (i32::try_from(src.len()), u32::try_from(dst.len())) else {
            return (DecodeStatus::failed(-1), None);
        };
        let (mut width, mut height, mut channels) = (0u32, 0u32, 0u32);
        let mut icc_ptr: *mut u8 = ptr::null_mut();
        let mut icc_len = 0u32;
        // SAFETY: as in `decode`; the profile out-params are locals.
        let status = unsafe {
            sys::bitgrain_decode_icc(
                src.as_ptr(),
                size,
                dst.as_mut_ptr(),
                capacity,
                &mut width,
                &mut height,
                &mut channels,
                &mut icc_ptr,
                &mut icc_len,
            )
        };
        // Take ownership first so the profile is freed on every path.
        let icc = NonNull::new(icc_ptr).map(|ptr| NativeIcc { ptr, len: icc_len });
        let status = DecodeStatus {
            status: status as i32,
            width,
            height,
            channels,
        };
        (status, icc.as_ref().map(NativeIcc::to_vec))
    }
}
