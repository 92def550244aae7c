use std::path::Path;

use anyhow::{Result, bail};
use clap::Parser;

mod cli;
mod decode;
mod encode;
mod image_io;
mod info;
mod paths;
mod roundtrip;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    run(args.command)
}

fn run(cmd: cli::Command) -> Result<()> {
    match cmd {
        cli::Command::Encode(args) => encode::run_encode(&args),
        cli::Command::Decode(args) => decode::run_decode(&args),
        cli::Command::Roundtrip(args) => roundtrip::run_roundtrip(&args),
        cli::Command::Info(args) => info::run_info(&args),
    }
}

/// Per-file errors are reported and the batch keeps going; any failure makes the
/// process exit nonzero at the end.
#[derive(Debug, Default)]
pub(crate) struct Failures {
    count: usize,
}

impl Failures {
    pub(crate) fn record(&mut self, input: &Path, err: anyhow::Error) {
        eprintln!("Error: {}: {err:#}", input.display());
        self.count += 1;
    }

    pub(crate) fn finish(self, what: &str) -> Result<()> {
        if self.count > 0 {
            bail!("Failed to {what} {} file(s)", self.count);
        }
        Ok(())
    }
}
