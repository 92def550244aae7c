use std::fs;

use anyhow::{Context, Result};
use bitgrain::{Bitgrain, Decoder};

use crate::{
    Failures,
    cli::DecodeArgs,
    image_io,
    paths::{self, InputKind, OutputPlan},
};

const DEFAULT_EXT: &str = "jpg";

pub fn run_decode(args: &DecodeArgs) -> Result<()> {
    let inputs = paths::expand_inputs(&args.io.inputs, InputKind::Bg)?;
    let plan = OutputPlan::resolve(&args.io, &inputs, |p| {
        paths::default_output(p, DEFAULT_EXT)
    })?;
    let decoder = Decoder::new(Bitgrain);
    let mut failures = Failures::default();

    for input in &inputs {
        let res = fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))
            .and_then(|stream| {
                decoder
                    .decode_with_icc(&stream)
                    .with_context(|| format!("Decoding {} failed", input.display()))
            })
            .and_then(|(img, icc)| {
                let out = plan.target(input, DEFAULT_EXT, args.io.overwrite);
                image_io::save(&out, &img, args.jpeg_quality, icc.as_deref())?;
                Ok((out, img))
            });
        match res {
            Ok((out, img)) => println!(
                "{} -> {} ({}x{}, {} channels)",
                input.display(),
                out.display(),
                img.width,
                img.height,
                img.channels
            ),
            Err(err) => failures.record(input, err),
        }
    }

    failures.finish("decode")
}
