//! Lossless stand-in for the native codec: header followed by raw samples.

use crate::backend::{NativeDecoder, NativeEncoder};
use crate::header::{HEADER_LEN, Header, ICC_TRAILER_OVERHEAD};
use crate::types::{DEFAULT_QUALITY, DecodeStatus, EncodeStatus, PixelLayout};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct FakeCodec {
    pub encode_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
    pub capacities: Mutex<Vec<usize>>,
    /// Encode calls that fail before the codec starts behaving.
    pub fail_encodes: AtomicUsize,
    pub out_len_override: Option<i32>,
    pub channels_override: Option<u32>,
    pub delay: Option<Duration>,
}

impl FakeCodec {
    pub fn encodes(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decodes(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    pub fn seen_capacities(&self) -> Vec<usize> {
        self.capacities.lock().unwrap().clone()
    }
}

impl FakeCodec {
    #[allow(clippy::too_many_arguments)]
    fn write(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
        icc: Option<&[u8]>,
    ) -> EncodeStatus {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        self.capacities.lock().unwrap().push(dst.len());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self
            .fail_encodes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return EncodeStatus::failed(-1);
        }
        let trailer = icc.map_or(0, |p| ICC_TRAILER_OVERHEAD + p.len());
        let body = HEADER_LEN + src.len();
        let total = body + trailer;
        if total > dst.len() {
            return EncodeStatus::failed(-1);
        }
        let quality = if quality == 0 { DEFAULT_QUALITY } else { quality };
        dst[..HEADER_LEN].copy_from_slice(&Header::new(layout, width, height, quality).to_bytes());
        dst[HEADER_LEN..body].copy_from_slice(src);
        if let Some(icc) = icc {
            dst[body..body + 4].copy_from_slice(b"BGx\x01");
            dst[body + 4..body + 8].copy_from_slice(&(icc.len() as u32).to_le_bytes());
            dst[body + 8..total].copy_from_slice(icc);
        }
        EncodeStatus::ok(self.out_len_override.unwrap_or(total as i32))
    }
}

/// Profile bytes of a trailer starting at `rest[0]`, if well formed.
fn read_trailer(rest: &[u8]) -> Option<Vec<u8>> {
    let (tag, rest) = rest.split_first_chunk::<4>()?;
    let (len, rest) = rest.split_first_chunk::<4>()?;
    if tag != b"BGx\x01" {
        return None;
    }
    rest.get(..u32::from_le_bytes(*len) as usize).map(<[u8]>::to_vec)
}

impl NativeEncoder for FakeCodec {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus {
        self.write(layout, src, width, height, dst, quality, None)
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
        if layout == PixelLayout::Gray {
            return EncodeStatus::failed(-1);
        }
        self.write(layout, src, width, height, dst, quality, Some(icc))
    }
}

impl NativeDecoder for FakeCodec {
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        self.decode_with_icc(src, dst).0
    }

    fn decode_with_icc(&self, src: &[u8], dst: &mut [u8]) -> (DecodeStatus, Option<Vec<u8>>) {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        let Ok(header) = Header::parse(src) else {
            return (DecodeStatus::failed(-1), None);
        };
        let len = header.decoded_len() as usize;
        let payload = &src[HEADER_LEN..];
        if payload.len() < len || dst.len() < len {
            return (DecodeStatus::failed(-1), None);
        }
        dst[..len].copy_from_slice(&payload[..len]);
        let status = DecodeStatus::ok(
            header.width,
            header.height,
            self.channels_override.unwrap_or(header.channels()),
        );
        (status, read_trailer(&payload[len..]))
    }
}
