use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use bitgrain::{HEADER_LEN, Header};

use crate::{
    Failures,
    cli::InfoArgs,
    paths::{self, InputKind},
};

pub fn run_info(args: &InfoArgs) -> Result<()> {
    let inputs = paths::expand_inputs(&args.inputs, InputKind::Bg)?;
    let mut failures = Failures::default();

    for input in &inputs {
        match read_header(input) {
            Ok((header, size)) => println!(
                "{}: {}x{} {}, quality {}, {} bytes ({} raw)",
                input.display(),
                header.width,
                header.height,
                header.layout.name(),
                header.quality,
                size,
                header.decoded_len()
            ),
            Err(err) => failures.record(input, err),
        }
    }

    failures.finish("inspect")
}

fn read_header(path: &Path) -> Result<(Header, u64)> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    let mut buf = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64)
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let header = Header::parse(&buf).with_context(|| format!("{} is not a .bg file", path.display()))?;
    Ok((header, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitgrain::PixelLayout;

    #[test]
    fn header_and_size_are_reported() {
        let path = std::env::temp_dir().join(format!("bitgrain-info-{}.bg", std::process::id()));
        let mut bytes = Header::new(PixelLayout::Rgb, 640, 480, 85).to_bytes().to_vec();
        bytes.extend_from_slice(&[0; 20]);
        std::fs::write(&path, &bytes).unwrap();
        let (header, size) = read_header(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((header.width, header.height), (640, 480));
        assert_eq!(size, 32);
    }

    #[test]
    fn failures_name_the_file() {
        let missing = Path::new("no/such/file.bg");
        let err = read_header(missing).unwrap_err();
        assert_eq!(err.to_string(), "Failed to open no/such/file.bg");

        let path = std::env::temp_dir().join(format!("bitgrain-short-{}.bg", std::process::id()));
        std::fs::write(&path, b"BG").unwrap();
        let err = read_header(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().ends_with("is not a .bg file"), "{err}");
    }
}
