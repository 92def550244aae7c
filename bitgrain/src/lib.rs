//! Safe Rust bindings for the Bitgrain `.bg` image codec.
//!
//! The codec itself is a native library reached through a small C ABI; this crate
//! owns everything around the call:
//! - [`Encoder`] validates packed gray/RGB/RGBA buffers, sizes the output buffer from
//!   its [`Config`], and trims the result to what the codec wrote.
//! - [`Decoder`] reads the fixed [`header`] to size the pixel buffer, then returns a
//!   [`DecodedImage`] carrying the dimensions the codec reported.
//! - RGB and RGBA streams can carry an ICC profile
//!   ([`Encoder::encode_with_icc`], [`Decoder::decode_with_icc`]).
//! - [`NativeEncoder`] / [`NativeDecoder`] are the seam to the codec. With the
//!   `native` feature, [`Bitgrain`] implements both on top of [`sys`].
//!
//! Every failure is a distinct [`Error`] variant; no partially written buffer is ever
//! returned.
//!
//! The `bitgrain-cli` package in this workspace is a complete user of the API.

/// Low-level bindings to the native library. Most users should favor the safe
/// wrappers re-exported from this crate.
#[cfg(feature = "native")]
pub use bitgrain_sys as sys;

mod backend;
mod config;
mod decoder;
mod encoder;
mod error;
pub mod header;
pub mod metrics;
#[cfg(feature = "native")]
mod native;
pub mod offload;
mod translate;
mod types;

#[cfg(test)]
mod testing;

pub use backend::{NativeDecoder, NativeEncoder};
pub use config::{Config, DEFAULT_MAX_DIMENSION};
pub use decoder::Decoder;
pub use encoder::{EncodeJob, Encoder};
pub use error::{Error, Result};
pub use header::{HEADER_LEN, Header, ICC_TRAILER_OVERHEAD};
#[cfg(feature = "native")]
pub use native::Bitgrain;
pub use types::*;
