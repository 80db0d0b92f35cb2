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

//! Algorithm registry
//!
//! The set of identifiers is fixed at build time. Whether an identifier is
//! usable depends on which backends were compiled in: `identity` always,
//! `gzip` and `deflate` with the `deflate` feature, `brotli` and `zstd`
//! never (they are reserved names only).

use crate::error::CompressionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal accepted in configuration meaning "any supported algorithm"
pub const ALL_LITERAL: &str = "all";

/// Algorithm used when nothing is configured
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::Identity;

/// Compression algorithm identifier
///
/// Ordinals are stable and match the order identifiers are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Algorithm {
    /// No compression
    Identity = 0,
    /// DEFLATE with gzip header and trailer
    Gzip = 1,
    /// DEFLATE with zlib framing, as used by HTTP `Content-Encoding: deflate`
    Deflate = 2,
    /// Reserved, no backend
    Brotli = 3,
    /// Reserved, no backend
    Zstd = 4,
}

impl Algorithm {
    /// Every identifier in ordinal order, implemented or not
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Identity,
        Algorithm::Gzip,
        Algorithm::Deflate,
        Algorithm::Brotli,
        Algorithm::Zstd,
    ];

    /// Identifier string, also the `Content-Encoding` header value
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Identity => "identity",
            Algorithm::Gzip => "gzip",
            Algorithm::Deflate => "deflate",
            Algorithm::Brotli => "brotli",
            Algorithm::Zstd => "zstd",
        }
    }

    /// Stable ordinal position
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Value for the `Content-Encoding` header after compressing with this algorithm
    pub fn content_encoding(self) -> &'static str {
        self.as_str()
    }

    /// Check whether a working backend for this algorithm is compiled in
    pub fn is_implemented(self) -> bool {
        match self {
            Algorithm::Identity => true,
            Algorithm::Gzip | Algorithm::Deflate => cfg!(feature = "deflate"),
            Algorithm::Brotli | Algorithm::Zstd => false,
        }
    }

    /// Look up an identifier without allocating an error
    pub fn from_name(name: &str) -> Option<Self> {
        Algorithm::ALL.into_iter().find(|algorithm| algorithm.as_str() == name)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_name(s).ok_or_else(|| CompressionError::unsupported_algorithm(s))
    }
}

/// Check whether `identifier` names an algorithm with a compiled-in backend.
///
/// Matching is case-sensitive. Unknown strings are simply unsupported.
pub fn is_supported(identifier: &str) -> bool {
    Algorithm::from_name(identifier).is_some_and(Algorithm::is_implemented)
}

/// Implemented algorithms in ordinal order
pub fn supported_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL
        .into_iter()
        .filter(|algorithm| algorithm.is_implemented())
        .collect()
}

/// Encodings a peer may use when answering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptEncoding {
    /// Any supported algorithm
    All,
    /// Exactly one algorithm
    Only(Algorithm),
}

impl AcceptEncoding {
    /// Parse a configured value, either [`ALL_LITERAL`] or a supported identifier
    pub fn parse(value: &str) -> Result<Self, CompressionError> {
        if value == ALL_LITERAL {
            return Ok(AcceptEncoding::All);
        }

        match Algorithm::from_name(value) {
            Some(algorithm) if algorithm.is_implemented() => Ok(AcceptEncoding::Only(algorithm)),
            _ => Err(CompressionError::unsupported_algorithm(value)),
        }
    }

    /// Check whether `algorithm` is acceptable
    pub fn accepts(self, algorithm: Algorithm) -> bool {
        match self {
            AcceptEncoding::All => algorithm.is_implemented(),
            AcceptEncoding::Only(only) => only == algorithm,
        }
    }

    /// Render the `Accept-Encoding` header value
    pub fn header_value(self) -> String {
        match self {
            AcceptEncoding::All => supported_algorithms()
                .into_iter()
                .filter(|algorithm| *algorithm != Algorithm::Identity)
                .map(Algorithm::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            AcceptEncoding::Only(algorithm) => algorithm.as_str().to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(Algorithm::Identity.ordinal(), 0);
        assert_eq!(Algorithm::Gzip.ordinal(), 1);
        assert_eq!(Algorithm::Deflate.ordinal(), 2);
        assert_eq!(Algorithm::Brotli.ordinal(), 3);
        assert_eq!(Algorithm::Zstd.ordinal(), 4);
    }

    #[test]
    fn test_identity_always_supported() {
        assert!(is_supported("identity"));
        assert_eq!(DEFAULT_ALGORITHM, Algorithm::Identity);
    }

    #[test]
    fn test_reserved_algorithms_unsupported() {
        assert!(!is_supported("brotli"));
        assert!(!is_supported("zstd"));
        assert!(!Algorithm::Zstd.is_implemented());
    }

    #[test]
    fn test_unknown_and_miscased_names() {
        assert!(!is_supported(""));
        assert!(!is_supported("lz4"));
        assert!(!is_supported("GZIP"));
        assert!(!is_supported(ALL_LITERAL));
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_deflate_family_supported() {
        assert!(is_supported("gzip"));
        assert!(is_supported("deflate"));
        assert_eq!(
            supported_algorithms(),
            vec![Algorithm::Identity, Algorithm::Gzip, Algorithm::Deflate]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("gzip".parse::<Algorithm>().ok(), Some(Algorithm::Gzip));
        let err = "Deflate".parse::<Algorithm>().unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_content_encoding_is_identifier() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.content_encoding(), algorithm.to_string());
        }
    }

    #[test]
    fn test_accept_encoding_parse() {
        assert_eq!(AcceptEncoding::parse("all").ok(), Some(AcceptEncoding::All));
        assert_eq!(
            AcceptEncoding::parse("identity").ok(),
            Some(AcceptEncoding::Only(Algorithm::Identity))
        );
        assert!(AcceptEncoding::parse("zstd").is_err());
        assert!(AcceptEncoding::parse("ALL").is_err());
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_accept_encoding_header_value() {
        assert_eq!(AcceptEncoding::All.header_value(), "gzip, deflate");
        assert_eq!(AcceptEncoding::Only(Algorithm::Gzip).header_value(), "gzip");
        assert!(AcceptEncoding::All.accepts(Algorithm::Deflate));
        assert!(!AcceptEncoding::All.accepts(Algorithm::Brotli));
        assert!(!AcceptEncoding::Only(Algorithm::Gzip).accepts(Algorithm::Deflate));
    }
}
