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

//! Compression error types
//!
//! Native codec result codes are fine-grained and backend specific. Every
//! code is folded into the closed [`UnifiedErrorCode`] set before it leaves
//! the engine, so callers only ever match on a handful of outcomes.

use std::fmt;
use thiserror::Error;

/// Result type alias for compression operations
pub type CompressionResult<T> = Result<T, CompressionError>;

/// Unified outcome of a single compression call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnifiedErrorCode {
    /// Compression succeeded
    Ok,
    /// Output space was insufficient, before or during the codec run
    Buffer,
    /// The codec rejected its input as malformed
    Data,
    /// The codec was driven with an invalid stream state or parameters
    Stream,
    /// Allocation failed inside the codec or for the output buffer
    Memory,
    /// Any native code without a dedicated mapping
    Unspecified,
}

impl UnifiedErrorCode {
    /// Lowercase category name used in error reports
    pub fn category(self) -> &'static str {
        match self {
            UnifiedErrorCode::Ok => "ok",
            UnifiedErrorCode::Buffer => "buffer",
            UnifiedErrorCode::Data => "data",
            UnifiedErrorCode::Stream => "stream",
            UnifiedErrorCode::Memory => "memory",
            UnifiedErrorCode::Unspecified => "unspecified",
        }
    }

    /// Check if this code reports success
    pub fn is_ok(self) -> bool {
        self == UnifiedErrorCode::Ok
    }
}

impl fmt::Display for UnifiedErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Result codes returned by a zlib-compatible deflate implementation.
///
/// Discriminants match the numeric values of zlib's `Z_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ZlibCode {
    /// `Z_OK`
    Ok = 0,
    /// `Z_STREAM_END`
    StreamEnd = 1,
    /// `Z_NEED_DICT`
    NeedDict = 2,
    /// `Z_ERRNO`
    Errno = -1,
    /// `Z_STREAM_ERROR`
    StreamError = -2,
    /// `Z_DATA_ERROR`
    DataError = -3,
    /// `Z_MEM_ERROR`
    MemError = -4,
    /// `Z_BUF_ERROR`
    BufError = -5,
    /// `Z_VERSION_ERROR`
    VersionError = -6,
}

impl ZlibCode {
    /// Decode a raw zlib return value
    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(ZlibCode::Ok),
            1 => Some(ZlibCode::StreamEnd),
            2 => Some(ZlibCode::NeedDict),
            -1 => Some(ZlibCode::Errno),
            -2 => Some(ZlibCode::StreamError),
            -3 => Some(ZlibCode::DataError),
            -4 => Some(ZlibCode::MemError),
            -5 => Some(ZlibCode::BufError),
            -6 => Some(ZlibCode::VersionError),
            _ => None,
        }
    }

    /// Raw numeric value of this code
    pub fn raw(self) -> i32 {
        self as i32
    }
}

/// Translate a native codec result into the unified taxonomy.
///
/// `StreamEnd` is a loop signal consumed by the engine and has no unified
/// counterpart, so it lands in [`UnifiedErrorCode::Unspecified`] like every
/// other unmapped code.
pub fn translate(code: ZlibCode) -> UnifiedErrorCode {
    match code {
        ZlibCode::Ok => UnifiedErrorCode::Ok,
        ZlibCode::BufError => UnifiedErrorCode::Buffer,
        ZlibCode::MemError => UnifiedErrorCode::Memory,
        ZlibCode::StreamError => UnifiedErrorCode::Stream,
        ZlibCode::DataError => UnifiedErrorCode::Data,
        _ => UnifiedErrorCode::Unspecified,
    }
}

/// Translate a raw numeric zlib return value
pub fn translate_raw(code: i32) -> UnifiedErrorCode {
    ZlibCode::from_raw(code).map_or(UnifiedErrorCode::Unspecified, translate)
}

/// Errors that can occur during compression operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// The codec run ended in a non-OK unified outcome
    #[error("Failed due to {0} error")]
    Codec(UnifiedErrorCode),

    /// The algorithm has no compiled-in backend
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A failure policy name that is neither `fallback` nor `abort`
    #[error("unknown failure policy: {0}")]
    UnknownPolicy(String),
}

impl CompressionError {
    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm<S: Into<String>>(algorithm: S) -> Self {
        CompressionError::UnsupportedAlgorithm(algorithm.into())
    }

    /// Unified category of this error
    ///
    /// Configuration errors never reach a codec, they are reported as
    /// [`UnifiedErrorCode::Unspecified`].
    pub fn code(&self) -> UnifiedErrorCode {
        match self {
            CompressionError::Codec(code) => *code,
            CompressionError::UnsupportedAlgorithm(_) | CompressionError::UnknownPolicy(_) => {
                UnifiedErrorCode::Unspecified
            }
        }
    }

    /// Check if this is an unsupported algorithm error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CompressionError::UnsupportedAlgorithm(_))
    }
}

impl From<UnifiedErrorCode> for CompressionError {
    fn from(code: UnifiedErrorCode) -> Self {
        CompressionError::Codec(code)
    }
}
