use bitgrain::{
    DecodeStatus, EncodeStatus, HEADER_LEN, Header, NativeDecoder, NativeEncoder, PixelLayout,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Behaves like the native codec at the ABI level, storing samples uncompressed.
#[derive(Default)]
pub struct RawCodec {
    pub calls: AtomicUsize,
}

impl RawCodec {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NativeEncoder for RawCodec {
    fn encode(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        dst: &mut [u8],
        quality: u8,
    ) -> EncodeStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let total = HEADER_LEN + src.len();
        if dst.len() < total {
            return EncodeStatus::failed(-1);
        }
        let header = Header::new(layout, width, height, quality);
        dst[..HEADER_LEN].copy_from_slice(&header.to_bytes());
        dst[HEADER_LEN..total].copy_from_slice(src);
        EncodeStatus::ok(total as i32)
    }
}

impl NativeDecoder for RawCodec {
    fn decode(&self, src: &[u8], dst: &mut [u8]) -> DecodeStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Ok(header) = Header::parse(src) else {
            return DecodeStatus::failed(-1);
        };
        let len = header.decoded_len() as usize;
        match (src.get(HEADER_LEN..HEADER_LEN + len), dst.get_mut(..len)) {
            (Some(payload), Some(out)) => {
                out.copy_from_slice(payload);
                DecodeStatus::ok(header.width, header.height, header.channels())
            }
            _ => DecodeStatus::failed(-1),
        }
    }
}

/// A codec that claims success but reports lengths it never wrote.
pub struct LyingCodec {
    pub out_len: i32,
    pub reported: (u32, u32, u32),
}

impl NativeEncoder for LyingCodec {
    fn encode(
        &self,
        _layout: PixelLayout,
        _src: &[u8],
        _width: u32,
        _height: u32,
        _dst: &mut [u8],
        _quality: u8,
    ) -> EncodeStatus {
        EncodeStatus::ok(self.out_len)
    }
}

impl NativeDecoder for LyingCodec {
    fn decode(&self, _src: &[u8], _dst: &mut [u8]) -> DecodeStatus {
        let (w, h, c) = self.reported;
        DecodeStatus::ok(w, h, c)
    }
}
