use std::path::PathBuf;

use bitgrain::Config;
use clap::{Args, Parser, Subcommand, builder::ValueHint};

/// Command-line arguments for the bitgrain tool.
#[derive(Parser, Debug)]
#[command(
    name = "bitgrain",
    about = "Compress images to the .bg format and back.",
    author,
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode images (PNG, JPEG, WebP, BMP, TGA, PNM) to .bg
    Encode(EncodeArgs),
    /// Decode .bg files to images; the output extension picks the format
    Decode(DecodeArgs),
    /// Encode and decode in memory without writing a .bg file
    Roundtrip(RoundtripArgs),
    /// Print the header of .bg files
    Info(InfoArgs),
}

/// Inputs and output shared by every subcommand that writes files.
#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input files or directories (directories are scanned one level deep)
    #[arg(value_name = "INPUT", value_hint = ValueHint::AnyPath, required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file, or output directory when there are several inputs
    #[arg(long, short = 'o', value_hint = ValueHint::AnyPath, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Overwrite existing files instead of picking a free name
    #[arg(long, short = 'y')]
    pub overwrite: bool,
}

/// Output-buffer policy for the encoder.
#[derive(Args, Debug, Clone)]
pub struct BufferArgs {
    /// Encode buffer size as a multiple of the raw image size
    #[arg(long, default_value_t = 2.0, value_name = "FACTOR")]
    pub multiplier: f64,

    /// Retry once with a doubled buffer when the encoder fails
    #[arg(long)]
    pub grow: bool,
}

impl BufferArgs {
    pub fn config(&self) -> Config {
        Config::default()
            .with_capacity_multiplier(self.multiplier)
            .with_grow_on_failure(self.grow)
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// .bg quality (1-100)
    #[arg(
        long,
        short = 'q',
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    #[command(flatten)]
    pub buffer: BufferArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// JPEG quality when the output is .jpg (1-100)
    #[arg(
        long = "jpeg-q",
        short = 'Q',
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub jpeg_quality: u8,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// .bg quality (1-100)
    #[arg(
        long,
        short = 'q',
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// JPEG quality when the output is .jpg (1-100)
    #[arg(
        long = "jpeg-q",
        short = 'Q',
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub jpeg_quality: u8,

    /// Print PSNR/SSIM against the original
    #[arg(long, short = 'm')]
    pub metrics: bool,

    #[command(flatten)]
    pub buffer: BufferArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// .bg files or directories
    #[arg(value_name = "INPUT", value_hint = ValueHint::AnyPath, required = true)]
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn encode_defaults() {
        let cli = Cli::try_parse_from(["bitgrain", "encode", "a.png"]).unwrap();
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.quality, 85);
        assert_eq!(args.io.inputs, vec![PathBuf::from("a.png")]);
        assert!(args.io.out.is_none());
        assert_eq!(args.buffer.config(), Config::default());
    }

    #[test]
    fn quality_range_is_enforced() {
        assert!(Cli::try_parse_from(["bitgrain", "encode", "-q", "0", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["bitgrain", "encode", "-q", "101", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["bitgrain", "encode", "-q", "100", "a.png"]).is_ok());
    }

    #[test]
    fn roundtrip_flags() {
        let cli = Cli::try_parse_from([
            "bitgrain", "roundtrip", "-m", "--grow", "--multiplier", "3", "-o", "out", "a.png",
            "b.png",
        ])
        .unwrap();
        let Command::Roundtrip(args) = cli.command else {
            panic!("expected roundtrip");
        };
        assert!(args.metrics);
        assert_eq!(args.io.inputs.len(), 2);
        let cfg = args.buffer.config();
        assert!(cfg.grow_on_failure);
        assert_eq!(cfg.capacity_multiplier, 3.0);
    }
}
