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

//! Outbound payload compression for BodyPress
//!
//! This crate compresses message bodies before they are handed to a network
//! transport:
//! - **Registry**: which algorithm identifiers exist and which are usable
//! - **Compressors**: one object per algorithm with a uniform `compress`
//! - **Streaming engine**: single-shot DEFLATE/gzip through a zlib-style codec
//! - **Unified errors**: native codec codes folded into a small closed set
//!
//! # Quick Start
//!
//! ```rust
//! use bodypress_compression::{compressor_from_name, is_supported, Compressor};
//!
//! assert!(is_supported("gzip"));
//! let compressor = compressor_from_name("gzip").unwrap();
//!
//! let mut compressed = Vec::new();
//! assert!(compressor.compress(&mut compressed, b"Hello, World!"));
//! assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
//! assert_eq!(compressor.content_encoding(), "gzip");
//! ```
//!
//! # Failure handling
//!
//! [`Compressor::compress`] never panics on codec failure. It emits one
//! `ERROR` event with target `compression`, releases the destination buffer
//! and returns `false`. [`encode_body`] layers a [`FailurePolicy`] on top to
//! decide whether the uncompressed body is sent instead.

pub mod algorithm;
pub mod body;
pub mod compressor;
pub mod engine;
pub mod error;
pub mod factory;
pub mod sizing;

#[cfg(test)]
mod test_support;

use std::fmt::Debug;

pub use algorithm::{
    is_supported, supported_algorithms, AcceptEncoding, Algorithm, ALL_LITERAL, DEFAULT_ALGORITHM,
};
pub use body::{encode_body, EncodedBody, FailurePolicy};
pub use compressor::{DeflateCompressor, GzipCompressor, IdentityCompressor};
pub use engine::{
    DeflateCodec, DeflateParams, DeflateStream, DeflateVariant, StreamEngine, DEFLATE_WINDOW_BITS,
    GZIP_WINDOW_BITS, MAX_MEM_LEVEL,
};
pub use error::{translate, translate_raw, CompressionError, CompressionResult, UnifiedErrorCode, ZlibCode};
pub use factory::{compressor_for, compressor_from_name};
pub use sizing::output_capacity;

#[cfg(feature = "deflate")]
pub use engine::{ZlibRsCodec, ZlibRsStream};

/// Compressor trait, one implementation per algorithm
///
/// A compressor is bound to a single algorithm for its whole life and keeps
/// no codec state between calls, so one instance can serve any number of
/// sequential calls. Give each worker its own instance.
pub trait Compressor: Send + Sync + Debug {
    /// Algorithm this compressor is bound to
    fn algorithm(&self) -> Algorithm;

    /// Compress `input` into `dest`, replacing its contents
    ///
    /// # Errors
    ///
    /// Returns `CompressionError::Codec` with the unified category when the
    /// codec fails. `dest` holds no meaningful data in that case.
    fn compress_into(&self, dest: &mut Vec<u8>, input: &[u8]) -> CompressionResult<()>;

    /// Compress `input` into `dest` and report the outcome
    ///
    /// On `true`, `dest` holds exactly the compressed bytes. On `false`, one
    /// error event has been emitted and `dest` has been released; it must
    /// not be sent.
    fn compress(&self, dest: &mut Vec<u8>, input: &[u8]) -> bool {
        match self.compress_into(dest, input) {
            Ok(()) => true,
            Err(err) => {
                compressor::report_failure(self.algorithm(), &err, None);
                *dest = Vec::new();
                false
            }
        }
    }

    /// `Content-Encoding` value for bodies produced by this compressor
    fn content_encoding(&self) -> &'static str {
        self.algorithm().content_encoding()
    }
}
