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

//! Compressor implementations
//!
//! One type per implemented algorithm. The gzip and deflate compressors are
//! thin bindings of [`StreamEngine`] to a variant; they are generic over the
//! codec so tests can swap in a failing backend.

use crate::algorithm::Algorithm;
use crate::engine::{DeflateCodec, DeflateVariant, StreamEngine};
use crate::error::{CompressionError, CompressionResult, UnifiedErrorCode};
use crate::Compressor;
use std::fmt;
use tracing::error;

#[cfg(feature = "deflate")]
use crate::engine::ZlibRsCodec;

/// Pass-through compressor for `identity`
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCompressor;

impl IdentityCompressor {
    /// Create a new identity compressor
    pub fn new() -> Self {
        IdentityCompressor
    }
}

impl Compressor for IdentityCompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Identity
    }

    fn compress_into(&self, dest: &mut Vec<u8>, input: &[u8]) -> CompressionResult<()> {
        dest.clear();
        dest.try_reserve_exact(input.len())
            .map_err(|_| CompressionError::Codec(UnifiedErrorCode::Memory))?;
        dest.extend_from_slice(input);
        Ok(())
    }
}

/// Gzip compressor (DEFLATE with gzip header and trailer)
#[derive(Clone)]
pub struct GzipCompressor<C> {
    engine: StreamEngine<C>,
}

#[cfg(feature = "deflate")]
impl GzipCompressor<ZlibRsCodec> {
    /// Create a gzip compressor backed by zlib-rs
    pub fn new() -> Self {
        GzipCompressor::with_codec(ZlibRsCodec)
    }
}

#[cfg(feature = "deflate")]
impl Default for GzipCompressor<ZlibRsCodec> {
    fn default() -> Self {
        GzipCompressor::new()
    }
}

impl<C: DeflateCodec> GzipCompressor<C> {
    /// Create a gzip compressor on top of a specific codec
    pub fn with_codec(codec: C) -> Self {
        GzipCompressor {
            engine: StreamEngine::new(codec, DeflateVariant::Gzip),
        }
    }
}

impl<C> fmt::Debug for GzipCompressor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipCompressor")
            .field("window_bits", &DeflateVariant::Gzip.window_bits())
            .finish()
    }
}

impl<C: DeflateCodec> Compressor for GzipCompressor<C> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Gzip
    }

    fn compress_into(&self, dest: &mut Vec<u8>, input: &[u8]) -> CompressionResult<()> {
        self.engine.run(dest, input)?;
        Ok(())
    }
}

/// Deflate compressor (zlib-framed DEFLATE)
#[derive(Clone)]
pub struct DeflateCompressor<C> {
    engine: StreamEngine<C>,
}

#[cfg(feature = "deflate")]
impl DeflateCompressor<ZlibRsCodec> {
    /// Create a deflate compressor backed by zlib-rs
    pub fn new() -> Self {
        DeflateCompressor::with_codec(ZlibRsCodec)
    }
}

#[cfg(feature = "deflate")]
impl Default for DeflateCompressor<ZlibRsCodec> {
    fn default() -> Self {
        DeflateCompressor::new()
    }
}

impl<C: DeflateCodec> DeflateCompressor<C> {
    /// Create a deflate compressor on top of a specific codec
    pub fn with_codec(codec: C) -> Self {
        DeflateCompressor {
            engine: StreamEngine::new(codec, DeflateVariant::Deflate),
        }
    }
}

impl<C> fmt::Debug for DeflateCompressor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeflateCompressor")
            .field("window_bits", &DeflateVariant::Deflate.window_bits())
            .finish()
    }
}

impl<C: DeflateCodec> Compressor for DeflateCompressor<C> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Deflate
    }

    fn compress_into(&self, dest: &mut Vec<u8>, input: &[u8]) -> CompressionResult<()> {
        self.engine.run(dest, input)?;
        Ok(())
    }
}

/// Emit the single error event for a failed call
///
/// `outcome`, when given, is appended to the message and names what happens
/// to the body next.
pub(crate) fn report_failure(algorithm: Algorithm, err: &CompressionError, outcome: Option<&str>) {
    let category = err.code().category();
    match outcome {
        Some(outcome) => error!(
            target: "compression",
            algorithm = algorithm.as_str(),
            category,
            "Failed due to {} error. {}",
            category,
            outcome
        ),
        None => error!(
            target: "compression",
            algorithm = algorithm.as_str(),
            category,
            "Failed due to {} error",
            category
        ),
    }
}
