use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail, ensure};

use crate::cli::IoArgs;

const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tga", "pgm", "ppm", "pnm", "webp"];
const DEFAULT_MULTI_DIR: &str = "out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Bg,
}

impl InputKind {
    fn accepts(self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(OsStr::to_str) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        match self {
            InputKind::Image => IMAGE_EXTS.contains(&ext.as_str()),
            InputKind::Bg => ext == "bg",
        }
    }

    fn label(self) -> &'static str {
        match self {
            InputKind::Image => "image files",
            InputKind::Bg => ".bg files",
        }
    }
}

/// Expand files and directories into the list of inputs to process.
pub fn expand_inputs(paths: &[PathBuf], kind: InputKind) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                eprintln!("Warning: skipping '{}': {err}", path.display());
                continue;
            }
        };
        if meta.is_file() {
            if kind.accepts(path) {
                out.push(path.clone());
            } else {
                eprintln!(
                    "Warning: skipping '{}': not one of the {}",
                    path.display(),
                    kind.label()
                );
            }
            continue;
        }
        let mut found: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("Failed to list directory {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                !p.file_name()
                    .and_then(OsStr::to_str)
                    .is_some_and(|n| n.starts_with('.'))
            })
            .filter(|p| p.is_file() && kind.accepts(p))
            .collect();
        found.sort();
        out.extend(found);
    }
    ensure!(!out.is_empty(), "No {} found in the given path(s)", kind.label());
    Ok(out)
}

/// Where each input is written.
#[derive(Debug)]
pub enum OutputPlan {
    Single(PathBuf),
    Dir(PathBuf),
}

impl OutputPlan {
    pub fn resolve(
        io: &IoArgs,
        inputs: &[PathBuf],
        default_single: impl Fn(&Path) -> PathBuf,
    ) -> Result<Self> {
        if inputs.len() == 1 {
            let out = io
                .out
                .clone()
                .unwrap_or_else(|| default_single(&inputs[0]));
            return Ok(OutputPlan::Single(out));
        }

        let dir = io
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MULTI_DIR));
        if dir.is_file() {
            bail!(
                "With multiple inputs -o must be a directory (got file {})",
                dir.display()
            );
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Could not create output directory {}", dir.display()))?;
        Ok(OutputPlan::Dir(dir))
    }

    /// Output path for `input`, named `<stem>.<ext>` inside the output directory in
    /// multi-input mode.
    pub fn target(&self, input: &Path, ext: &str, overwrite: bool) -> PathBuf {
        let path = match self {
            OutputPlan::Single(path) => path.clone(),
            OutputPlan::Dir(dir) => dir.join(with_extension(file_stem(input), ext)),
        };
        if overwrite {
            path
        } else {
            avoid_overwrite(&path, |p| p.exists())
        }
    }
}

fn file_stem(path: &Path) -> &OsStr {
    path.file_stem().unwrap_or_else(|| OsStr::new("image"))
}

fn with_extension(stem: &OsStr, ext: &str) -> PathBuf {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// `<dir>/<stem>.<ext>`, or `<stem> (1).<ext>` when that would be the input itself.
pub fn default_output(input: &Path, ext: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let out = parent.join(with_extension(file_stem(input), ext));
    if out == input {
        let mut name = file_stem(input).to_os_string();
        name.push(" (1).");
        name.push(ext);
        return parent.join(name);
    }
    out
}

/// First of `path`, `<stem> (1).<ext>`, `<stem> (2).<ext>`... that does not exist yet.
pub fn avoid_overwrite(path: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(path) {
        return path.to_path_buf();
    }
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = file_stem(path);
    let ext = path.extension();
    for n in 1..=9999 {
        let mut name = stem.to_os_string();
        name.push(format!(" ({n})"));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        let candidate = parent.join(name);
        if !exists(&candidate) {
            return candidate;
        }
    }
    path.to_path_buf()
}
