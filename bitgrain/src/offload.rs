//! Run one blocking codec call on its own thread.
//!
//! The native ABI cannot be interrupted. A call that misses its deadline is abandoned:
//! the worker keeps running to completion and its result is dropped.

use crate::backend::{NativeDecoder, NativeEncoder};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::types::{DecodedImage, PixelLayout};
use crossbeam::channel::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Run `job` on a named worker thread and wait up to `timeout` (forever if `None`).
pub fn run_detached<T, F>(name: &str, timeout: Option<Duration>, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = channel::bounded(1);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout.
            let _ = tx.send(job());
        })
        .map_err(|_| Error::WorkerLost)?;

    match timeout {
        Some(limit) => match rx.recv_timeout(limit) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => Err(Error::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(Error::WorkerLost),
        },
        None => rx.recv().unwrap_or(Err(Error::WorkerLost)),
    }
}

impl<B> Encoder<B>
where
    B: NativeEncoder + Clone + Send + 'static,
{
    /// [`Encoder::encode`] on a dedicated thread. Takes the pixels by value since an
    /// abandoned worker may outlive the caller's borrow.
    pub fn encode_detached(
        &self,
        layout: PixelLayout,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        quality: u8,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let encoder = self.clone();
        run_detached("bitgrain-encode", timeout, move || {
            encoder.encode(layout, &pixels, width, height, quality)
        })
    }
}

impl<B> Decoder<B>
where
    B: NativeDecoder + Clone + Send + 'static,
{
    /// [`Decoder::decode`] on a dedicated thread.
    pub fn decode_detached(
        &self,
        stream: Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<DecodedImage> {
        let decoder = self.clone();
        run_detached("bitgrain-decode", timeout, move || decoder.decode(&stream))
    }
}
