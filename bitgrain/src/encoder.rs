use crate::backend::NativeEncoder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::header::ICC_TRAILER_OVERHEAD;
use crate::translate::finish_encode;
use crate::types::{PixelLayout, raw_len, raw_len_wide};

/// Encodes packed pixel buffers to `.bg` streams through a [`NativeEncoder`].
#[derive(Debug, Clone, Default)]
pub struct Encoder<B> {
    backend: B,
    config: Config,
}

/// One image of an [`Encoder::encode_batch`] call.
#[derive(Debug, Clone, Copy)]
pub struct EncodeJob<'a> {
    pub layout: PixelLayout,
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    /// Profile to embed; see [`Encoder::encode_with_icc`].
    pub icc: Option<&'a [u8]>,
}

impl<B> Encoder<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, Config::default())
    }

    pub fn with_config(backend: B, config: Config) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Destination capacity an encode of this shape would allocate.
    pub fn capacity_for(&self, layout: PixelLayout, width: u32, height: u32) -> Result<usize> {
        let raw = raw_len(width, height, layout.bytes_per_pixel()).ok_or(
            Error::CapacityOverflow {
                requested: raw_len_wide(width, height, layout.bytes_per_pixel()),
            },
        )?;
        self.config.encode_capacity(raw)
    }

    /// Check dimensions and length; returns exactly the pixels the codec will read.
    fn source<'p>(
        &self,
        layout: PixelLayout,
        pixels: &'p [u8],
        width: u32,
        height: u32,
    ) -> Result<&'p [u8]> {
        self.config.check_dimensions(width, height)?;
        let bpp = layout.bytes_per_pixel();
        let required = raw_len(width, height, bpp).ok_or(Error::CapacityOverflow {
            requested: raw_len_wide(width, height, bpp),
        })?;
        pixels.get(..required).ok_or_else(|| {
            Error::invalid_input(format!(
                "{} buffer of {} bytes, {width}x{height} needs {required}",
                layout.name(),
                pixels.len()
            ))
        })
    }
}

impl<B: NativeEncoder> Encoder<B> {
    pub fn encode_grayscale(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>> {
        self.encode(PixelLayout::Gray, pixels, width, height, quality)
    }

    pub fn encode_rgb(&self, pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
        self.encode(PixelLayout::Rgb, pixels, width, height, quality)
    }

    pub fn encode_rgba(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>> {
        self.encode(PixelLayout::Rgba, pixels, width, height, quality)
    }

    /// Encode `pixels` laid out as `layout`.
    ///
    /// `quality` is forwarded untouched; `0` selects the codec default
    /// ([`DEFAULT_QUALITY`](crate::DEFAULT_QUALITY)). Trailing bytes past
    /// `width * height * bpp` are ignored.
    pub fn encode(
        &self,
        layout: PixelLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>> {
        self.encode_inner(layout, pixels, width, height, quality, None)
    }

    /// Like [`Encoder::encode`], with `icc` embedded as a trailer that
    /// [`Decoder::decode_with_icc`](crate::Decoder::decode_with_icc) hands back.
    ///
    /// The native codec only carries profiles in RGB and RGBA streams. An empty
    /// profile encodes exactly like [`Encoder::encode`].
    pub fn encode_with_icc(
        &self,
        layout: PixelLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
        icc: &[u8],
    ) -> Result<Vec<u8>> {
        if icc.is_empty() {
            return self.encode(layout, pixels, width, height, quality);
        }
        if layout == PixelLayout::Gray {
            return Err(Error::invalid_input(
                "ICC profiles can only be embedded in rgb or rgba streams",
            ));
        }
        self.encode_inner(layout, pixels, width, height, quality, Some(icc))
    }

    fn encode_inner(
        &self,
        layout: PixelLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
        icc: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let src = self.source(layout, pixels, width, height)?;
        let mut capacity = self.config.encode_capacity(src.len())?;
        if let Some(icc) = icc {
            capacity = with_icc_trailer(capacity, icc.len())?;
        }
        match self.attempt(layout, src, width, height, quality, icc, capacity) {
            Err(err @ Error::NativeFailure { .. }) if self.config.grow_on_failure => {
                match self.config.grown_capacity(capacity) {
                    Some(grown) => self.attempt(layout, src, width, height, quality, icc, grown),
                    None => Err(err),
                }
            }
            res => res,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn attempt(
        &self,
        layout: PixelLayout,
        src: &[u8],
        width: u32,
        height: u32,
        quality: u8,
        icc: Option<&[u8]>,
        capacity: usize,
    ) -> Result<Vec<u8>> {
        let mut dst = self.config.alloc_buffer(capacity)?;
        let status = match icc {
            Some(icc) => self
                .backend
                .encode_with_icc(layout, src, width, height, &mut dst, quality, icc),
            None => self
                .backend
                .encode(layout, src, width, height, &mut dst, quality),
        };
        finish_encode(dst, status)
    }

    fn encode_job(&self, job: &EncodeJob<'_>) -> Result<Vec<u8>> {
        match job.icc {
            Some(icc) => self.encode_with_icc(
                job.layout,
                job.pixels,
                job.width,
                job.height,
                job.quality,
                icc,
            ),
            None => self.encode(job.layout, job.pixels, job.width, job.height, job.quality),
        }
    }
}

/// Room for the profile trailer on top of the pixel-derived capacity.
fn with_icc_trailer(capacity: usize, icc_len: usize) -> Result<usize> {
    let requested = capacity as u128 + ICC_TRAILER_OVERHEAD as u128 + icc_len as u128;
    if requested > u32::MAX as u128 {
        return Err(Error::CapacityOverflow { requested });
    }
    Ok(requested as usize)
}

#[cfg(feature = "rayon")]
impl<B: NativeEncoder> Encoder<B> {
    /// Encode independent images on the rayon pool; results keep the input order.
    pub fn encode_batch(&self, jobs: &[EncodeJob<'_>]) -> Vec<Result<Vec<u8>>> {
        use rayon::prelude::*;
        jobs.par_iter().map(|job| self.encode_job(job)).collect()
    }
}

#[cfg(not(feature = "rayon"))]
impl<B: NativeEncoder> Encoder<B> {
    /// Encode independent images in order.
    pub fn encode_batch(&self, jobs: &[EncodeJob<'_>]) -> Vec<Result<Vec<u8>>> {
        jobs.iter().map(|job| self.encode_job(job)).collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::testing::FakeCodec;
    use proptest::prelude::*;

    fn layout_strategy() -> impl Strategy<Value = PixelLayout> {
        prop_oneof![
            Just(PixelLayout::Gray),
            Just(PixelLayout::Rgb),
            Just(PixelLayout::Rgba)
        ]
    }

    proptest! {
        /// Property: any buffer shorter than w*h*bpp is rejected before the codec runs.
        #[test]
        fn prop_short_buffers_rejected(
            layout in layout_strategy(),
            width in 1u32..=32,
            height in 1u32..=32,
            shortfall in 1usize..=64,
        ) {
            let fake = FakeCodec::default();
            let enc = Encoder::new(&fake);
            let required = (width * height) as usize * layout.bytes_per_pixel();
            let len = required.saturating_sub(shortfall);
            let pixels = vec![0u8; len];
            let res = enc.encode(layout, &pixels, width, height, 85);
            prop_assert!(matches!(res, Err(Error::InvalidInput(_))));
            prop_assert_eq!(fake.encodes(), 0);
        }

        /// Property: successful output never exceeds the computed capacity.
        #[test]
        fn prop_output_within_capacity(
            layout in layout_strategy(),
            width in 1u32..=48,
            height in 1u32..=48,
            quality in 0u8..=100,
        ) {
            let fake = FakeCodec::default();
            let enc = Encoder::new(&fake);
            let pixels = vec![0x5a; (width * height) as usize * layout.bytes_per_pixel()];
            let out = enc.encode(layout, &pixels, width, height, quality).unwrap();
            let capacity = (pixels.len() * 2).max(1024);
            prop_assert!(out.len() <= capacity);
            prop_assert_eq!(enc.capacity_for(layout, width, height).unwrap(), capacity);
        }
    }
}
