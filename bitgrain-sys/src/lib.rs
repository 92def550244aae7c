//! Raw FFI declarations for the Bitgrain `.bg` codec.
//!
//! Everything here is `unsafe` and mirrors `include/bitgrain.h` one to one. The safe
//! wrappers live in the `bitgrain` crate.

#![allow(non_camel_case_types, non_upper_case_globals, non_snake_case)]

#[cfg(feature = "bindgen")]
include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

#[cfg(not(feature = "bindgen"))]
include!("bindings.rs");

/// Status returned by every entry point on success.
pub const BITGRAIN_OK: ::std::os::raw::c_int = 0;

/// Fixed `.bg` header length written by the native encoder.
pub const BITGRAIN_HEADER_LEN: usize = 12;

/// Bytes in front of an embedded ICC profile: `"BGx"`, chunk type, LE length.
pub const BITGRAIN_ICC_TRAILER_LEN: usize = 8;

/// Largest width or height the native decoder accepts.
pub const BITGRAIN_MAX_DIM: u32 = 65536;
