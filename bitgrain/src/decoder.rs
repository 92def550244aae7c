use crate::backend::NativeDecoder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::header::{self, Header, MAX_CHANNELS};
use crate::translate::finish_decode;
use crate::types::DecodedImage;

/// Decodes `.bg` streams through a [`NativeDecoder`].
///
/// Only [`Config::max_buffer`] applies here; the encode knobs are ignored.
#[derive(Debug, Clone, Default)]
pub struct Decoder<B> {
    backend: B,
    config: Config,
}

impl<B> Decoder<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, Config::default())
    }

    pub fn with_config(backend: B, config: Config) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate the header without decoding the payload.
    pub fn inspect(&self, stream: &[u8]) -> Result<Header> {
        Header::parse(stream)
    }

    /// Prescan, check the ABI size limit and allocate the destination.
    fn prepare<'s>(&self, stream: &'s [u8], channels: usize) -> Result<(&'s [u8], Vec<u8>)> {
        let (width, height) = header::prescan(stream)?;
        let capacity = header::decode_capacity(width, height, channels)?;
        let src = abi_stream(stream)?;
        let dst = self.config.alloc_buffer(capacity)?;
        Ok((src, dst))
    }
}

/// The ABI passes stream sizes as `int32_t`.
fn abi_stream(stream: &[u8]) -> Result<&[u8]> {
    if i32::try_from(stream.len()).is_err() {
        return Err(Error::invalid_input(format!(
            "stream of {} bytes exceeds the native size limit",
            stream.len()
        )));
    }
    Ok(stream)
}

impl<B: NativeDecoder> Decoder<B> {
    /// Decode a stream of any layout. The destination is sized for four channels from
    /// the header; the returned image carries what the codec actually produced.
    pub fn decode(&self, stream: &[u8]) -> Result<DecodedImage> {
        let (src, mut dst) = self.prepare(stream, MAX_CHANNELS)?;
        let status = self.backend.decode(src, &mut dst);
        finish_decode(dst, status)
    }

    /// [`Decoder::decode`], also returning the embedded ICC profile if the stream has
    /// one.
    pub fn decode_with_icc(&self, stream: &[u8]) -> Result<(DecodedImage, Option<Vec<u8>>)> {
        let (src, mut dst) = self.prepare(stream, MAX_CHANNELS)?;
        let (status, icc) = self.backend.decode_with_icc(src, &mut dst);
        let image = finish_decode(dst, status)?;
        Ok((image, icc.filter(|p| !p.is_empty())))
    }

    /// Decode a grayscale stream; other layouts fail in the codec.
    pub fn decode_grayscale(&self, stream: &[u8]) -> Result<DecodedImage> {
        let (src, mut dst) = self.prepare(stream, 1)?;
        let status = self.backend.decode_grayscale(src, &mut dst);
        if status.status == 0 && status.channels != 1 {
            return Err(Error::corrupt(format!(
                "grayscale decode produced {} channels",
                status.channels
            )));
        }
        finish_decode(dst, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::header::HEADER_LEN;
    use crate::testing::FakeCodec;
    use crate::types::PixelLayout;

    #[test]
    fn truncated_streams_skip_the_codec() {
        let fake = FakeCodec::default();
        let dec = Decoder::new(&fake);
        assert_eq!(
            dec.decode(&[b'B', b'G', 1, 4, 0]),
            Err(Error::TruncatedHeader { len: 5 })
        );
        assert_eq!(
            dec.decode_grayscale(&[0; 11]),
            Err(Error::TruncatedHeader { len: 11 })
        );
        assert_eq!(fake.decodes(), 0);
    }

    #[test]
    fn zero_sized_header_is_invalid_dimensions() {
        let fake = FakeCodec::default();
        let dec = Decoder::new(&fake);
        let stream = Header::new(PixelLayout::Rgb, 0, 32, 85).to_bytes();
        assert_eq!(
            dec.decode(&stream),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 32
            })
        );
        assert_eq!(fake.decodes(), 0);
    }

    #[test]
    fn round_trip_every_layout() {
        let fake = FakeCodec::default();
        let enc = Encoder::new(&fake);
        let dec = Decoder::new(&fake);
        for layout in PixelLayout::ALL {
            let pixels: Vec<u8> = (0..5 * 3 * layout.bytes_per_pixel())
                .map(|i| i as u8)
                .collect();
            let stream = enc.encode(layout, &pixels, 5, 3, 90).unwrap();
            let img = dec.decode(&stream).unwrap();
            assert_eq!((img.width, img.height), (5, 3));
            assert_eq!(img.channels, layout.channels());
            assert_eq!(img.pixels, pixels);
        }
    }

    #[test]
    fn native_metadata_wins_over_prescan() {
        let fake = FakeCodec {
            channels_override: Some(3),
            ..Default::default()
        };
        let dec = Decoder::new(&fake);
        let mut stream = Header::new(PixelLayout::Gray, 4, 4, 85).to_bytes().to_vec();
        stream.extend_from_slice(&[1u8; 16]);
        let img = dec.decode(&stream).unwrap();
        assert_eq!(img.channels, 3);
        assert_eq!(img.pixels.len(), 48);
    }

    #[test]
    fn codec_failure_is_native_failure() {
        let fake = FakeCodec::default();
        let dec = Decoder::new(&fake);
        // Valid prefix, missing payload.
        let stream = Header::new(PixelLayout::Rgba, 8, 8, 85).to_bytes();
        assert_eq!(dec.decode(&stream), Err(Error::NativeFailure { status: -1 }));
        assert_eq!(fake.decodes(), 1);
    }

    #[test]
    fn impossible_channel_count_is_corrupt() {
        let fake = FakeCodec {
            channels_override: Some(2),
            ..Default::default()
        };
        let dec = Decoder::new(&fake);
        let mut stream = Header::new(PixelLayout::Gray, 2, 2, 85).to_bytes().to_vec();
        stream.extend_from_slice(&[0u8; 4]);
        assert!(matches!(dec.decode(&stream), Err(Error::CorruptStatus(_))));
    }

    #[test]
    fn grayscale_decode_rejects_color_streams() {
        let fake = FakeCodec::default();
        let enc = Encoder::new(&fake);
        let dec = Decoder::new(&fake);

        let gray = enc.encode_grayscale(&[7u8; 9], 3, 3, 0).unwrap();
        let img = dec.decode_grayscale(&gray).unwrap();
        assert_eq!((img.width, img.height, img.channels), (3, 3, 1));
        assert_eq!(img.pixels, vec![7u8; 9]);

        let rgb = enc.encode_rgb(&[7u8; 27], 3, 3, 0).unwrap();
        assert!(dec.decode_grayscale(&rgb).is_err());
    }

    #[test]
    fn oversized_header_is_an_error_not_an_abort() {
        let fake = FakeCodec::default();
        let dec = Decoder::with_config(&fake, Config::default().with_max_buffer(Some(64 << 20)));
        // 12 bytes claiming a 32767x32768 image: ~4 GiB at four channels.
        let stream = Header::new(PixelLayout::Gray, 32767, 32768, 85).to_bytes();
        let want = Err(Error::AllocationFailed {
            bytes: 32767 * 32768 * 4,
        });
        assert_eq!(dec.decode(&stream), want);
        assert_eq!(dec.decode_with_icc(&stream).map(|(img, _)| img), want);
        assert_eq!(
            dec.decode_grayscale(&stream),
            Err(Error::AllocationFailed {
                bytes: 32767 * 32768
            })
        );
        assert_eq!(fake.decodes(), 0);
    }

    #[test]
    fn icc_profile_survives_round_trip() {
        let fake = FakeCodec::default();
        let enc = Encoder::new(&fake);
        let dec = Decoder::new(&fake);
        let icc: Vec<u8> = (0..300).map(|i| i as u8).collect();
        let pixels = vec![40u8; 6 * 4 * 4];
        let stream = enc
            .encode_with_icc(PixelLayout::Rgba, &pixels, 6, 4, 80, &icc)
            .unwrap();
        let (img, profile) = dec.decode_with_icc(&stream).unwrap();
        assert_eq!(img.pixels, pixels);
        assert_eq!(profile, Some(icc));

        let plain = enc.encode_rgb(&[1u8; 12], 2, 2, 0).unwrap();
        assert_eq!(dec.decode_with_icc(&plain).unwrap().1, None);
        // Plain decode ignores the trailer.
        assert_eq!(dec.decode(&stream).unwrap().pixels.len(), pixels.len());
    }

    #[test]
    fn inspect_reports_header() {
        let dec = Decoder::new(FakeCodec::default());
        let header = Header::new(PixelLayout::Rgb, 10, 20, 70);
        let mut stream = header.to_bytes().to_vec();
        stream.resize(HEADER_LEN + 600, 0);
        assert_eq!(dec.inspect(&stream), Ok(header));
    }
}
