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

//! Compressor construction by algorithm

use crate::algorithm::Algorithm;
use crate::compressor::IdentityCompressor;
use crate::error::{CompressionError, CompressionResult};
use crate::Compressor;
use tracing::debug;

#[cfg(feature = "deflate")]
use crate::compressor::{DeflateCompressor, GzipCompressor};

/// Build a compressor bound to `algorithm`.
///
/// Algorithms without a compiled-in backend are rejected with
/// [`CompressionError::UnsupportedAlgorithm`].
pub fn compressor_for(algorithm: Algorithm) -> CompressionResult<Box<dyn Compressor>> {
    let compressor: Box<dyn Compressor> = match algorithm {
        Algorithm::Identity => Box::new(IdentityCompressor::new()),
        #[cfg(feature = "deflate")]
        Algorithm::Gzip => Box::new(GzipCompressor::new()),
        #[cfg(feature = "deflate")]
        Algorithm::Deflate => Box::new(DeflateCompressor::new()),
        unsupported => {
            return Err(CompressionError::unsupported_algorithm(unsupported.as_str()));
        }
    };

    debug!(target: "compression", algorithm = algorithm.as_str(), "compressor created");
    Ok(compressor)
}

/// Build a compressor from a configured identifier such as `"gzip"`
pub fn compressor_from_name(name: &str) -> CompressionResult<Box<dyn Compressor>> {
    compressor_for(name.parse()?)
}
