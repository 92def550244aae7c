use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bitgrain::{Bitgrain, EncodeJob, Encoder, PixelLayout};

use crate::{
    Failures,
    cli::EncodeArgs,
    image_io::{self, Loaded},
    paths::{self, InputKind, OutputPlan},
};

pub fn run_encode(args: &EncodeArgs) -> Result<()> {
    let inputs = paths::expand_inputs(&args.io.inputs, InputKind::Image)?;
    let plan = OutputPlan::resolve(&args.io, &inputs, |p| paths::default_output(p, "bg"))?;
    let encoder = Encoder::with_config(Bitgrain, args.buffer.config());
    let mut failures = Failures::default();

    let mut loaded: Vec<(PathBuf, Loaded)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        match image_io::load(&input) {
            Ok(img) => loaded.push((input, img)),
            Err(err) => failures.record(&input, err),
        }
    }

    let jobs: Vec<EncodeJob<'_>> = loaded
        .iter()
        .map(|(input, img)| EncodeJob {
            layout: img.layout,
            pixels: &img.pixels,
            width: img.width,
            height: img.height,
            quality: args.quality,
            icc: embeddable_icc(input, img),
        })
        .collect();
    let results = encoder.encode_batch(&jobs);

    for ((input, img), res) in loaded.iter().zip(results) {
        let written = res
            .with_context(|| format!("Encoding {} failed", input.display()))
            .and_then(|bytes| {
                let out = plan.target(input, "bg", args.io.overwrite);
                fs::write(&out, &bytes)
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                Ok((out, bytes.len()))
            });
        match written {
            Ok((out, len)) => println!(
                "{} -> {} ({}x{} {}, {} bytes)",
                input.display(),
                out.display(),
                img.width,
                img.height,
                img.layout.name(),
                len
            ),
            Err(err) => failures.record(input, err),
        }
    }

    failures.finish("encode")
}

/// The source's color profile, if the stream can carry it.
pub(crate) fn embeddable_icc<'a>(input: &Path, img: &'a Loaded) -> Option<&'a [u8]> {
    let icc = img.icc.as_deref()?;
    if img.layout == PixelLayout::Gray {
        eprintln!(
            "Warning: {}: grayscale streams cannot carry a color profile, dropping it",
            input.display()
        );
        return None;
    }
    Some(icc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(layout: PixelLayout, icc: Option<&[u8]>) -> Loaded {
        Loaded {
            layout,
            width: 1,
            height: 1,
            pixels: vec![0; layout.channels() as usize],
            icc: icc.map(<[u8]>::to_vec),
        }
    }

    #[test]
    fn profiles_follow_color_sources_only() {
        let input = Path::new("in.png");
        let rgb = loaded(PixelLayout::Rgb, Some(b"icc"));
        assert_eq!(embeddable_icc(input, &rgb), Some(&b"icc"[..]));
        let gray = loaded(PixelLayout::Gray, Some(b"icc"));
        assert_eq!(embeddable_icc(input, &gray), None);
        let plain = loaded(PixelLayout::Rgba, None);
        assert_eq!(embeddable_icc(input, &plain), None);
    }
}
