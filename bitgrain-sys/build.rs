use std::env;
use std::path::{Path, PathBuf};

const LIB_NAME: &str = "bitgrain";

fn library_file_names(target_os: &str, target_env: &str, shared: bool) -> Vec<String> {
    match (shared, target_os, target_env) {
        (true, "macos", _) => vec![format!("lib{LIB_NAME}.dylib")],
        (true, "windows", _) => vec![format!("{LIB_NAME}.dll.lib"), format!("{LIB_NAME}.lib")],
        (true, _, _) => vec![format!("lib{LIB_NAME}.so")],
        (false, "windows", "msvc") => vec![format!("{LIB_NAME}.lib")],
        (false, _, _) => vec![format!("lib{LIB_NAME}.a")],
    }
}

fn candidate_dirs(manifest_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = env::var_os("BITGRAIN_LIB_DIR") {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(src) = env::var_os("BITGRAIN_SRC_DIR") {
        // Upstream `make bitgrain` drops the library in the cargo target of its rust/ dir.
        let src = PathBuf::from(src);
        dirs.push(src.join("rust/target/release"));
        dirs.push(src.join("build"));
    }

    // Fallback: sibling checkout of the upstream repository.
    if let Some(sibling) = manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(|p| p.join("bitgrain"))
    {
        dirs.push(sibling.join("rust/target/release"));
    }
    dirs
}

fn locate_library(dirs: &[PathBuf], names: &[String]) -> Option<PathBuf> {
    dirs.iter()
        .find(|dir| names.iter().any(|name| dir.join(name).is_file()))
        .cloned()
}

#[cfg(feature = "bindgen")]
fn generate_bindings(header: &Path, out_dir: &Path) {
    let bindings = bindgen::Builder::default()
        .header(header.to_string_lossy())
        .allowlist_function("bitgrain_.*")
        .rust_edition(bindgen::RustEdition::Edition2024)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .layout_tests(false)
        .generate()
        .expect("bindgen failed");
    bindings
        .write_to_file(out_dir.join("bindings.rs"))
        .expect("failed to write bindings");
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let header = manifest_dir.join("include/bitgrain.h");

    println!("cargo:rerun-if-env-changed=BITGRAIN_LIB_DIR");
    println!("cargo:rerun-if-env-changed=BITGRAIN_SRC_DIR");
    println!("cargo:rerun-if-env-changed=BITGRAIN_STATIC");
    println!("cargo:rerun-if-changed={}", header.display());

    #[cfg(feature = "bindgen")]
    {
        let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
        generate_bindings(&header, &out_dir);
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
    let target_family = env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();

    // BITGRAIN_STATIC=1 wins over the `shared` feature, matching the usual *-sys convention.
    let force_static = env::var("BITGRAIN_STATIC").is_ok_and(|v| v != "0");
    let shared = cfg!(feature = "shared") && !force_static;

    let names = library_file_names(&target_os, &target_env, shared);
    let dirs = candidate_dirs(&manifest_dir);
    let Some(lib_dir) = locate_library(&dirs, &names) else {
        // Emitting -lbitgrain without the archive would break every build of this crate,
        // including ones that never call into it. Leave resolution to the final link.
        println!(
            "cargo:warning=lib{LIB_NAME} not found (searched {} dirs); set BITGRAIN_LIB_DIR to link the native codec",
            dirs.len()
        );
        return;
    };

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    let link_kind = if shared { "dylib" } else { "static" };
    println!("cargo:rustc-link-lib={link_kind}={LIB_NAME}");
    println!("cargo:root={}", lib_dir.display());

    // The upstream library is a Rust staticlib; its runtime needs these on unix.
    if !shared && target_family == "unix" {
        println!("cargo:rustc-link-lib=pthread");
        println!("cargo:rustc-link-lib=m");
        if target_os != "macos" {
            println!("cargo:rustc-link-lib=dl");
        }
    }
}
