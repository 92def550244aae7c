use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, bail};
use bitgrain::{DecodedImage, PixelLayout};
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat, ImageReader,
    codecs::{bmp::BmpEncoder, jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder},
};

/// Packed 8-bit pixels ready for the encoder.
#[derive(Debug)]
pub struct Loaded {
    pub layout: PixelLayout,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Embedded color profile of the source file, if it had one.
    pub icc: Option<Vec<u8>>,
}

/// Decode any supported image file, keeping alpha and single-channel sources as-is.
pub fn load(path: &Path) -> Result<Loaded> {
    let load_err = || format!("Failed to load {}", path.display());
    let mut decoder = ImageReader::open(path)
        .with_context(load_err)?
        .with_guessed_format()
        .with_context(load_err)?
        .into_decoder()
        .with_context(load_err)?;
    let icc = match decoder.icc_profile() {
        Ok(icc) => icc.filter(|p| !p.is_empty()),
        Err(err) => {
            eprintln!("Warning: ignoring color profile of {}: {err}", path.display());
            None
        }
    };
    let img = DynamicImage::from_decoder(decoder).with_context(load_err)?;
    let mut loaded = from_dynamic(img);
    loaded.icc = icc;
    Ok(loaded)
}

fn from_dynamic(img: DynamicImage) -> Loaded {
    let (width, height) = (img.width(), img.height());
    let color = img.color();
    let (layout, pixels) = if color.has_alpha() {
        (PixelLayout::Rgba, img.into_rgba8().into_raw())
    } else if color.channel_count() == 1 {
        (PixelLayout::Gray, img.into_luma8().into_raw())
    } else {
        (PixelLayout::Rgb, img.into_rgb8().into_raw())
    };
    Loaded {
        layout,
        width,
        height,
        pixels,
        icc: None,
    }
}

fn color_type(layout: PixelLayout) -> ExtendedColorType {
    match layout {
        PixelLayout::Gray => ExtendedColorType::L8,
        PixelLayout::Rgb => ExtendedColorType::Rgb8,
        PixelLayout::Rgba => ExtendedColorType::Rgba8,
    }
}

/// Drop every fourth sample. JPEG and PNM cannot carry alpha.
fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Write decoded pixels; the format follows the extension of `path`.
///
/// `icc` is embedded where the format can carry it (JPEG, PNG, WebP) and dropped
/// with a warning elsewhere.
pub fn save(path: &Path, img: &DecodedImage, jpeg_quality: u8, icc: Option<&[u8]>) -> Result<()> {
    let Some(mut layout) = img.layout() else {
        bail!("Decoder returned {} channels", img.channels);
    };
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Unknown output format for {}", path.display()))?;
    if !matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::WebP
            | ImageFormat::Bmp
            | ImageFormat::Tga
            | ImageFormat::Pnm
    ) {
        bail!(
            "Unsupported output format {:?} for {} (use .jpg, .png, .webp, .bmp, .tga or .pnm)",
            format,
            path.display()
        );
    }

    let mut stripped = None;
    if layout == PixelLayout::Rgba && matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm) {
        stripped = Some(strip_alpha(&img.pixels));
        layout = PixelLayout::Rgb;
    }
    let pixels = stripped.as_deref().unwrap_or(&img.pixels);

    if matches!(format, ImageFormat::Tga | ImageFormat::Pnm) {
        if icc.is_some() {
            eprintln!(
                "Warning: {:?} cannot carry a color profile, dropping it for {}",
                format,
                path.display()
            );
        }
        return image::save_buffer_with_format(
            path,
            pixels,
            img.width,
            img.height,
            color_type(layout),
            format,
        )
        .with_context(|| format!("Failed to write {}", path.display()));
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let written = match format {
        ImageFormat::Jpeg => write_with_icc(
            JpegEncoder::new_with_quality(&mut out, jpeg_quality),
            pixels,
            img,
            layout,
            icc,
            path,
        ),
        ImageFormat::Png => write_with_icc(PngEncoder::new(&mut out), pixels, img, layout, icc, path),
        ImageFormat::WebP => write_with_icc(
            WebPEncoder::new_lossless(&mut out),
            pixels,
            img,
            layout,
            icc,
            path,
        ),
        _ => write_with_icc(BmpEncoder::new(&mut out), pixels, img, layout, icc, path),
    };
    written.with_context(|| format!("Failed to write {:?} {}", format, path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_with_icc<E: ImageEncoder>(
    mut encoder: E,
    pixels: &[u8],
    img: &DecodedImage,
    layout: PixelLayout,
    icc: Option<&[u8]>,
    path: &Path,
) -> Result<()> {
    if let Some(icc) = icc {
        if let Err(err) = encoder.set_icc_profile(icc.to_vec()) {
            eprintln!("Warning: color profile not written to {}: {err}", path.display());
        }
    }
    encoder.write_image(pixels, img.width, img.height, color_type(layout))?;
    Ok(())
}

/// Pixels of `loaded` shaped like `decoded`, for comparing a round trip.
pub fn comparable(loaded: &Loaded, decoded: &DecodedImage) -> Option<Vec<u8>> {
    if (loaded.width, loaded.height) != (decoded.width, decoded.height) {
        return None;
    }
    match (loaded.layout.channels(), decoded.channels) {
        (a, b) if a == b => Some(loaded.pixels.clone()),
        (4, 3) => Some(strip_alpha(&loaded.pixels)),
        _ => None,
    }
}
