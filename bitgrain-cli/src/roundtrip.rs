use std::path::Path;

use anyhow::{Context, Result};
use bitgrain::{Bitgrain, DecodedImage, Decoder, Encoder, metrics};

use crate::{
    Failures,
    cli::RoundtripArgs,
    encode::embeddable_icc,
    image_io::{self, Loaded},
    paths::{self, InputKind, OutputPlan},
};

const DEFAULT_EXT: &str = "jpg";

struct Trip {
    encoded_len: usize,
    decoded: DecodedImage,
    icc: Option<Vec<u8>>,
}

pub fn run_roundtrip(args: &RoundtripArgs) -> Result<()> {
    let inputs = paths::expand_inputs(&args.io.inputs, InputKind::Image)?;
    let plan = OutputPlan::resolve(&args.io, &inputs, |p| {
        paths::default_output(p, DEFAULT_EXT)
    })?;
    let encoder = Encoder::with_config(Bitgrain, args.buffer.config());
    let decoder = Decoder::new(Bitgrain);
    let mut failures = Failures::default();

    for input in &inputs {
        let res = image_io::load(input).and_then(|src| {
            let trip = trip(&encoder, &decoder, input, &src, args.quality)?;
            let out = plan.target(input, DEFAULT_EXT, args.io.overwrite);
            image_io::save(&out, &trip.decoded, args.jpeg_quality, trip.icc.as_deref())?;
            Ok((src, trip, out))
        });
        let (src, trip, out) = match res {
            Ok(done) => done,
            Err(err) => {
                failures.record(input, err);
                continue;
            }
        };

        let raw = src.pixels.len();
        println!(
            "{} -> {} ({}x{} {}, {} -> {} bytes, {:.2}:1)",
            input.display(),
            out.display(),
            src.width,
            src.height,
            src.layout.name(),
            raw,
            trip.encoded_len,
            raw as f64 / trip.encoded_len.max(1) as f64
        );
        if args.metrics {
            report_metrics(&src, &trip.decoded);
        }
    }

    failures.finish("round trip")
}

fn trip(
    encoder: &Encoder<Bitgrain>,
    decoder: &Decoder<Bitgrain>,
    input: &Path,
    src: &Loaded,
    quality: u8,
) -> Result<Trip> {
    let icc = embeddable_icc(input, src).unwrap_or_default();
    let stream = encoder
        .encode_with_icc(src.layout, &src.pixels, src.width, src.height, quality, icc)
        .with_context(|| format!("Encoding {} failed", input.display()))?;
    let (decoded, icc) = decoder
        .decode_with_icc(&stream)
        .with_context(|| format!("Decoding {} failed", input.display()))?;
    Ok(Trip {
        encoded_len: stream.len(),
        decoded,
        icc,
    })
}

fn report_metrics(src: &Loaded, decoded: &DecodedImage) {
    let Some(original) = image_io::comparable(src, decoded) else {
        eprintln!(
            "Warning: decoded image is {}x{}x{}, not comparable with the source",
            decoded.width, decoded.height, decoded.channels
        );
        return;
    };
    match (
        metrics::psnr(&original, &decoded.pixels),
        metrics::ssim(&original, &decoded.pixels),
    ) {
        (Ok(psnr), Ok(ssim)) => println!("  PSNR {psnr:.2} dB, SSIM {ssim:.4}"),
        (Err(err), _) | (_, Err(err)) => eprintln!("Warning: metrics unavailable: {err}"),
    }
}
