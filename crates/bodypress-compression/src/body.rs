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

//! Outbound body encoding
//!
//! Turns a request body into the bytes a transport should send, together
//! with the `Content-Encoding` value to advertise. A compression failure
//! never drops the message under the default [`FailurePolicy::Fallback`].

use crate::algorithm::Algorithm;
use crate::error::CompressionError;
use crate::compressor::report_failure;
use crate::Compressor;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const FALLBACK_OUTCOME: &str = "Uncompressed data will be sent instead";

/// What to do with a message whose body failed to compress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Send the original body uncompressed
    #[default]
    Fallback,
    /// Drop the message
    Abort,
}

impl FailurePolicy {
    /// Configuration name of this policy
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Fallback => "fallback",
            FailurePolicy::Abort => "abort",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fallback" => Ok(FailurePolicy::Fallback),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(CompressionError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Body ready to hand to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody<'a> {
    /// Bytes to send
    pub bytes: Cow<'a, [u8]>,
    /// `Content-Encoding` value, `None` when the body is sent as-is
    pub content_encoding: Option<&'static str>,
}

impl EncodedBody<'_> {
    /// Check whether compression was applied
    pub fn is_compressed(&self) -> bool {
        self.content_encoding.is_some()
    }

    /// `Content-Encoding: <name>` header line, if compression was applied
    pub fn header_line(&self) -> Option<String> {
        self.content_encoding
            .map(|encoding| format!("Content-Encoding: {}", encoding))
    }
}

/// Encode `body` with `compressor`, applying `policy` on failure.
///
/// Returns `None` only when compression failed and the policy is
/// [`FailurePolicy::Abort`].
pub fn encode_body<'a>(
    compressor: &dyn Compressor,
    body: &'a [u8],
    policy: FailurePolicy,
) -> Option<EncodedBody<'a>> {
    let algorithm = compressor.algorithm();
    if algorithm == Algorithm::Identity {
        return Some(EncodedBody {
            bytes: Cow::Borrowed(body),
            content_encoding: None,
        });
    }

    let mut compressed = Vec::new();
    let err = match compressor.compress_into(&mut compressed, body) {
        Ok(()) => {
            debug!(
                target: "compression",
                algorithm = algorithm.as_str(),
                original_size = body.len(),
                compressed_size = compressed.len(),
                "body compressed"
            );
            return Some(EncodedBody {
                bytes: Cow::Owned(compressed),
                content_encoding: Some(algorithm.content_encoding()),
            });
        }
        Err(err) => err,
    };

    match policy {
        FailurePolicy::Fallback => {
            report_failure(algorithm, &err, Some(FALLBACK_OUTCOME));
            Some(EncodedBody {
                bytes: Cow::Borrowed(body),
                content_encoding: None,
            })
        }
        FailurePolicy::Abort => {
            report_failure(algorithm, &err, None);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{CompressionResult, UnifiedErrorCode};
    use crate::test_support::capture;
    use tracing::Level;

    #[derive(Debug)]
    struct BrokenCompressor;

    impl Compressor for BrokenCompressor {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Gzip
        }

        fn compress_into(&self, _dest: &mut Vec<u8>, _input: &[u8]) -> CompressionResult<()> {
            Err(CompressionError::Codec(UnifiedErrorCode::Buffer))
        }
    }

    #[test]
    fn test_identity_passes_body_through() {
        let body = b"raw body";
        let encoded = encode_body(&crate::IdentityCompressor, body, FailurePolicy::Abort).unwrap();
        assert!(matches!(encoded.bytes, Cow::Borrowed(_)));
        assert_eq!(&*encoded.bytes, body);
        assert!(!encoded.is_compressed());
        assert_eq!(encoded.header_line(), None);
    }

    #[test]
    fn test_fallback_sends_original() {
        let body = b"fallback body";
        let mut encoded = None;

        let events = capture(|| {
            encoded = encode_body(&BrokenCompressor, body, FailurePolicy::Fallback);
        });

        let encoded = encoded.unwrap();
        assert_eq!(&*encoded.bytes, body);
        assert_eq!(encoded.content_encoding, None);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].target, "compression");
        assert_eq!(events[0].category.as_deref(), Some("buffer"));
        assert_eq!(
            events[0].message.as_deref(),
            Some("Failed due to buffer error. Uncompressed data will be sent instead")
        );
        assert!(events.iter().all(|e| e.level != Level::WARN));
    }

    #[test]
    fn test_abort_drops_message() {
        let mut encoded = Some(EncodedBody {
            bytes: Cow::Borrowed(&b""[..]),
            content_encoding: None,
        });

        let events = capture(|| {
            encoded = encode_body(&BrokenCompressor, b"body", FailurePolicy::Abort);
        });

        assert!(encoded.is_none());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].category.as_deref(), Some("buffer"));
        assert_eq!(
            events[0].message.as_deref(),
            Some("Failed due to buffer error")
        );
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_compressed_body_carries_encoding() {
        let body = b"compress me please, compress me please".repeat(10);
        let encoded =
            encode_body(&crate::DeflateCompressor::new(), &body, FailurePolicy::Fallback).unwrap();
        assert!(encoded.is_compressed());
        assert!(encoded.bytes.len() < body.len());
        assert_eq!(
            encoded.header_line().as_deref(),
            Some("Content-Encoding: deflate")
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("fallback".parse::<FailurePolicy>().ok(), Some(FailurePolicy::Fallback));
        assert_eq!("abort".parse::<FailurePolicy>().ok(), Some(FailurePolicy::Abort));
        assert!("Abort".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Fallback);
    }
}
