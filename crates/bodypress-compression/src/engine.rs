// BodyPress - Outbound Payload Compression
// Copyright (C) 2025 BodyPress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Streaming deflate engine
//!
//! Drives one single-shot compression through a zlib-style codec:
//!
//! 1. **Init**: size the output buffer for the worst case and open a
//!    stream with the variant's window bits. A failed open ends the run.
//! 2. **Running**: call deflate with `FINISH` until the codec reports
//!    stream end or an error.
//! 3. **Done**: shrink the output to the bytes actually written.
//! 4. **Failed**: the output contents are meaningless.
//!
//! The codec sits behind [`DeflateCodec`] / [`DeflateStream`] so the
//! engine can be driven by the zlib-rs backend or by a scripted one in tests.

use crate::algorithm::Algorithm;
use crate::error::{translate, UnifiedErrorCode, ZlibCode};
use crate::sizing;
use std::fmt::Debug;
use tracing::trace;

/// Window bits for zlib-framed deflate (zlib's `MAX_WBITS`)
pub const DEFLATE_WINDOW_BITS: u8 = 15;

/// Window bits requesting a gzip header and trailer (`MAX_WBITS + 16`)
pub const GZIP_WINDOW_BITS: u8 = 31;

/// DEFLATE-family variant handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateVariant {
    /// `Content-Encoding: deflate`
    Deflate,
    /// `Content-Encoding: gzip`
    Gzip,
}

impl DeflateVariant {
    /// Window bits passed to the codec for this variant
    pub fn window_bits(self) -> u8 {
        match self {
            DeflateVariant::Deflate => DEFLATE_WINDOW_BITS,
            DeflateVariant::Gzip => GZIP_WINDOW_BITS,
        }
    }

    /// Registry identifier of this variant
    pub fn algorithm(self) -> Algorithm {
        match self {
            DeflateVariant::Deflate => Algorithm::Deflate,
            DeflateVariant::Gzip => Algorithm::Gzip,
        }
    }
}

/// zlib's `MAX_MEM_LEVEL`: largest hash table and match buffer
pub const MAX_MEM_LEVEL: u8 = 9;

/// Stream initialization parameters.
///
/// Level, method and strategy are always the codec defaults. No data type
/// hint is carried: `deflateInit2` resets `data_type` to unknown, so a hint
/// set before init never reaches the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateParams {
    /// zlib-convention window bits (9..=15 zlib framing, 25..=31 gzip framing)
    pub window_bits: u8,
    /// Memory level, 1..=9
    pub mem_level: u8,
}

impl DeflateParams {
    /// Parameters for a variant
    pub fn for_variant(variant: DeflateVariant) -> Self {
        DeflateParams {
            window_bits: variant.window_bits(),
            mem_level: MAX_MEM_LEVEL,
        }
    }
}

/// A zlib-compatible deflate implementation
pub trait DeflateCodec: Send + Sync + Debug {
    /// Per-call stream state
    type Stream: DeflateStream;

    /// Open a new stream, the equivalent of `deflateInit2`
    fn init(&self, params: DeflateParams) -> Result<Self::Stream, ZlibCode>;
}

/// Mutable state of one open deflate stream.
///
/// Dropping the stream releases it.
pub trait DeflateStream {
    /// Run deflate with `FINISH` on the remaining input and output space
    fn deflate_finish(&mut self, input: &[u8], output: &mut [u8]) -> ZlibCode;

    /// Input bytes consumed since the stream was opened
    fn total_in(&self) -> u64;

    /// Output bytes produced since the stream was opened
    fn total_out(&self) -> u64;
}

/// Single-shot compression engine bound to one codec and variant
#[derive(Debug, Clone)]
pub struct StreamEngine<C> {
    codec: C,
    variant: DeflateVariant,
}

impl<C: DeflateCodec> StreamEngine<C> {
    /// Create an engine for `variant` backed by `codec`
    pub fn new(codec: C, variant: DeflateVariant) -> Self {
        StreamEngine { codec, variant }
    }

    /// Variant this engine produces
    pub fn variant(&self) -> DeflateVariant {
        self.variant
    }

    /// Compress all of `input` into `dest`.
    ///
    /// On success `dest` holds exactly the compressed bytes and their count is
    /// returned. On failure `dest` must not be used.
    pub fn run(&self, dest: &mut Vec<u8>, input: &[u8]) -> Result<usize, UnifiedErrorCode> {
        let capacity = sizing::prepare_output_buffer(dest, input.len())?;

        let params = DeflateParams::for_variant(self.variant);
        let mut stream = self.codec.init(params).map_err(failure)?;
        trace!(
            target: "compression",
            variant = ?self.variant,
            window_bits = params.window_bits,
            input_len = input.len(),
            capacity,
            "deflate stream running"
        );

        loop {
            let consumed = offset(stream.total_in(), input.len())?;
            let written = offset(stream.total_out(), capacity)?;

            let code = stream.deflate_finish(&input[consumed..], &mut dest[written..]);

            match code {
                ZlibCode::StreamEnd => {
                    let written = offset(stream.total_out(), capacity)?;
                    drop(stream);
                    dest.truncate(written);
                    return Ok(written);
                }
                ZlibCode::Ok => {
                    // zlib reports BUF_ERROR instead of stalling; treat a silent stall the same way
                    if offset(stream.total_in(), input.len())? == consumed
                        && offset(stream.total_out(), capacity)? == written
                    {
                        return Err(UnifiedErrorCode::Buffer);
                    }
                }
                other => return Err(failure(other)),
            }
        }
    }
}

/// Translate a code that ended the run
fn failure(code: ZlibCode) -> UnifiedErrorCode {
    match translate(code) {
        UnifiedErrorCode::Ok => UnifiedErrorCode::Unspecified,
        unified => unified,
    }
}

/// Convert a stream counter into an index bounded by `limit`
fn offset(total: u64, limit: usize) -> Result<usize, UnifiedErrorCode> {
    match usize::try_from(total) {
        Ok(value) if value <= limit => Ok(value),
        _ => Err(UnifiedErrorCode::Buffer),
    }
}

#[cfg(feature = "deflate")]
pub use self::zlib::{ZlibRsCodec, ZlibRsStream};

#[cfg(feature = "deflate")]
mod zlib {
    use super::{DeflateCodec, DeflateParams, DeflateStream};
    use crate::error::ZlibCode;
    use std::fmt;
    use tracing::debug;
    use zlib_rs::{Deflate, DeflateConfig, DeflateError, DeflateFlush, Method, Status, Strategy};

    /// zlib's `Z_DEFAULT_COMPRESSION`
    const DEFAULT_COMPRESSION_LEVEL: i32 = -1;

    /// Deflate codec backed by zlib-rs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ZlibRsCodec;

    /// Open zlib-rs compression stream
    pub struct ZlibRsStream {
        inner: Deflate,
    }

    impl fmt::Debug for ZlibRsStream {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ZlibRsStream")
                .field("total_in", &self.inner.total_in())
                .field("total_out", &self.inner.total_out())
                .finish()
        }
    }

    impl ZlibRsCodec {
        /// Full `deflateInit2` configuration for `params`
        pub fn config(params: DeflateParams) -> DeflateConfig {
            DeflateConfig {
                level: DEFAULT_COMPRESSION_LEVEL,
                method: Method::Deflated,
                window_bits: i32::from(params.window_bits),
                mem_level: i32::from(params.mem_level),
                strategy: Strategy::Default,
            }
        }
    }

    impl DeflateCodec for ZlibRsCodec {
        type Stream = ZlibRsStream;

        fn init(&self, params: DeflateParams) -> Result<ZlibRsStream, ZlibCode> {
            // deflateInit2 rejects anything else with Z_STREAM_ERROR; zlib-rs panics instead
            let window_ok = matches!(params.window_bits, 9..=15 | 25..=31);
            let mem_ok = matches!(params.mem_level, 1..=9);
            if !window_ok || !mem_ok {
                return Err(ZlibCode::StreamError);
            }

            Ok(ZlibRsStream {
                inner: Deflate::new_with_config(Self::config(params)),
            })
        }
    }

    impl DeflateStream for ZlibRsStream {
        fn deflate_finish(&mut self, input: &[u8], output: &mut [u8]) -> ZlibCode {
            match self.inner.compress(input, output, DeflateFlush::Finish) {
                Ok(Status::Ok) => ZlibCode::Ok,
                Ok(Status::BufError) => ZlibCode::BufError,
                Ok(Status::StreamEnd) => ZlibCode::StreamEnd,
                Err(err) => {
                    debug!(target: "compression", error = err.as_str(), "deflate failed");
                    match err {
                        DeflateError::StreamError => ZlibCode::StreamError,
                        DeflateError::DataError => ZlibCode::DataError,
                        DeflateError::MemError => ZlibCode::MemError,
                    }
                }
            }
        }

        fn total_in(&self) -> u64 {
            self.inner.total_in()
        }

        fn total_out(&self) -> u64 {
            self.inner.total_out()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Codec that copies input verbatim, optionally failing at a scripted point
    #[derive(Debug, Clone, Copy)]
    struct ScriptedCodec {
        init_result: Option<ZlibCode>,
        step_result: Option<ZlibCode>,
        chunk: usize,
    }

    struct ScriptedStream {
        step_result: Option<ZlibCode>,
        chunk: usize,
        total_in: u64,
        total_out: u64,
    }

    impl DeflateCodec for ScriptedCodec {
        type Stream = ScriptedStream;

        fn init(&self, _params: DeflateParams) -> Result<ScriptedStream, ZlibCode> {
            if let Some(code) = self.init_result {
                return Err(code);
            }
            Ok(ScriptedStream {
                step_result: self.step_result,
                chunk: self.chunk,
                total_in: 0,
                total_out: 0,
            })
        }
    }

    impl DeflateStream for ScriptedStream {
        fn deflate_finish(&mut self, input: &[u8], output: &mut [u8]) -> ZlibCode {
            if let Some(code) = self.step_result {
                return code;
            }
            let n = input.len().min(output.len()).min(self.chunk);
            output[..n].copy_from_slice(&input[..n]);
            self.total_in += n as u64;
            self.total_out += n as u64;
            if n == input.len() {
                ZlibCode::StreamEnd
            } else {
                ZlibCode::Ok
            }
        }

        fn total_in(&self) -> u64 {
            self.total_in
        }

        fn total_out(&self) -> u64 {
            self.total_out
        }
    }

    fn copying(chunk: usize) -> ScriptedCodec {
        ScriptedCodec {
            init_result: None,
            step_result: None,
            chunk,
        }
    }

    #[test]
    fn test_window_bits_constants() {
        assert_eq!(DeflateVariant::Deflate.window_bits(), 15);
        assert_eq!(DeflateVariant::Gzip.window_bits(), 31);
        assert_eq!(DeflateVariant::Gzip.algorithm(), Algorithm::Gzip);
        assert_eq!(
            DeflateParams::for_variant(DeflateVariant::Deflate).window_bits,
            DEFLATE_WINDOW_BITS
        );
    }

    #[test]
    fn test_engine_loops_until_stream_end() {
        let engine = StreamEngine::new(copying(3), DeflateVariant::Deflate);
        let mut dest = Vec::new();
        let written = engine.run(&mut dest, b"hello world").unwrap();
        assert_eq!(written, 11);
        assert_eq!(dest, b"hello world");
    }

    #[test]
    fn test_engine_truncates_to_written() {
        let engine = StreamEngine::new(copying(usize::MAX), DeflateVariant::Gzip);
        let mut dest = Vec::new();
        engine.run(&mut dest, b"abc").unwrap();
        assert_eq!(dest.len(), 3);
    }

    #[test]
    fn test_init_failure_is_translated() {
        let codec = ScriptedCodec {
            init_result: Some(ZlibCode::MemError),
            ..copying(1)
        };
        let engine = StreamEngine::new(codec, DeflateVariant::Gzip);
        let mut dest = Vec::new();
        assert_eq!(engine.run(&mut dest, b"data"), Err(UnifiedErrorCode::Memory));
    }

    #[test]
    fn test_step_failure_is_translated() {
        for (code, expected) in [
            (ZlibCode::StreamError, UnifiedErrorCode::Stream),
            (ZlibCode::DataError, UnifiedErrorCode::Data),
            (ZlibCode::BufError, UnifiedErrorCode::Buffer),
            (ZlibCode::VersionError, UnifiedErrorCode::Unspecified),
        ] {
            let codec = ScriptedCodec {
                step_result: Some(code),
                ..copying(1)
            };
            let engine = StreamEngine::new(codec, DeflateVariant::Deflate);
            let mut dest = Vec::new();
            assert_eq!(engine.run(&mut dest, b"data"), Err(expected), "{:?}", code);
        }
    }

    #[test]
    fn test_init_ok_code_is_not_success() {
        let codec = ScriptedCodec {
            init_result: Some(ZlibCode::Ok),
            ..copying(1)
        };
        let engine = StreamEngine::new(codec, DeflateVariant::Deflate);
        let mut dest = Vec::new();
        assert_eq!(engine.run(&mut dest, b"x"), Err(UnifiedErrorCode::Unspecified));
    }

    #[test]
    fn test_stalled_stream_is_buffer_error() {
        let engine = StreamEngine::new(copying(0), DeflateVariant::Deflate);
        let mut dest = Vec::new();
        assert_eq!(engine.run(&mut dest, b"xyz"), Err(UnifiedErrorCode::Buffer));
    }

    #[test]
    fn test_offset_bounds() {
        assert_eq!(offset(5, 10), Ok(5));
        assert_eq!(offset(10, 10), Ok(10));
        assert_eq!(offset(11, 10), Err(UnifiedErrorCode::Buffer));
    }

    /// Codec that records the parameters it was opened with
    #[derive(Debug, Clone, Default)]
    struct RecordingCodec {
        seen: Arc<Mutex<Vec<DeflateParams>>>,
    }

    impl DeflateCodec for RecordingCodec {
        type Stream = ScriptedStream;

        fn init(&self, params: DeflateParams) -> Result<ScriptedStream, ZlibCode> {
            self.seen.lock().unwrap().push(params);
            copying(usize::MAX).init(params)
        }
    }

    #[test]
    fn test_init_receives_max_mem_level() {
        for (variant, bits) in [
            (DeflateVariant::Deflate, DEFLATE_WINDOW_BITS),
            (DeflateVariant::Gzip, GZIP_WINDOW_BITS),
        ] {
            let codec = RecordingCodec::default();
            let engine = StreamEngine::new(codec.clone(), variant);
            let mut dest = Vec::new();
            engine.run(&mut dest, b"payload").unwrap();

            let seen = codec.seen.lock().unwrap();
            assert_eq!(
                *seen,
                vec![DeflateParams {
                    window_bits: bits,
                    mem_level: MAX_MEM_LEVEL,
                }]
            );
        }
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_zlib_codec_rejects_bad_params() {
        for bits in [0u8, 8, 16, 24, 32] {
            let result = ZlibRsCodec.init(DeflateParams {
                window_bits: bits,
                mem_level: MAX_MEM_LEVEL,
            });
            assert_eq!(result.err(), Some(ZlibCode::StreamError), "bits {}", bits);
        }
        for mem_level in [0u8, 10] {
            let result = ZlibRsCodec.init(DeflateParams {
                window_bits: DEFLATE_WINDOW_BITS,
                mem_level,
            });
            assert_eq!(result.err(), Some(ZlibCode::StreamError), "mem_level {}", mem_level);
        }
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_zlib_codec_config() {
        let config = ZlibRsCodec::config(DeflateParams::for_variant(DeflateVariant::Gzip));
        assert_eq!(config.level, -1);
        assert_eq!(config.method, zlib_rs::Method::Deflated);
        assert_eq!(config.window_bits, 31);
        assert_eq!(config.mem_level, 9);
        assert_eq!(config.strategy, zlib_rs::Strategy::Default);
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_output_matches_max_mem_level_deflate() {
        // long enough that the hash table size changes match decisions
        let text: Vec<u8> = (0..60_000u32)
            .flat_map(|i| format!("word{} ", i.wrapping_mul(2_654_435_761) % 7919).into_bytes())
            .collect();

        for variant in [DeflateVariant::Deflate, DeflateVariant::Gzip] {
            let engine = StreamEngine::new(ZlibRsCodec, variant);
            let mut dest = Vec::new();
            engine.run(&mut dest, &text).unwrap();

            let config = zlib_rs::DeflateConfig {
                level: -1,
                method: zlib_rs::Method::Deflated,
                window_bits: i32::from(variant.window_bits()),
                mem_level: 9,
                strategy: zlib_rs::Strategy::Default,
            };
            let mut expected = vec![0u8; zlib_rs::compress_bound(text.len())];
            let (written, code) = zlib_rs::compress_slice(&mut expected, &text, config);
            assert_eq!(code, zlib_rs::ReturnCode::Ok, "{:?}", variant);
            assert_eq!(dest, written.to_vec(), "{:?}", variant);
        }
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_zlib_engine_gzip_magic() {
        let engine = StreamEngine::new(ZlibRsCodec, DeflateVariant::Gzip);
        let mut dest = Vec::new();
        engine.run(&mut dest, b"Hello, World!").unwrap();
        assert_eq!(&dest[..2], &[0x1f, 0x8b]);
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_zlib_engine_deflate_header() {
        let engine = StreamEngine::new(ZlibRsCodec, DeflateVariant::Deflate);
        let mut dest = Vec::new();
        engine.run(&mut dest, b"Hello, World!").unwrap();
        assert_eq!(dest[0], 0x78);
        assert_ne!(&dest[..2], &[0x1f, 0x8b]);
    }
}
