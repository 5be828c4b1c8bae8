// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Formwerk.

use thiserror::Error;

/// Top-level error type for all Formwerk operations.
///
/// The text engine itself never fails; every variant here belongs to one of
/// the collaborators around it (request validation, document assembly,
/// branding, the HTTP service, configuration).
#[derive(Debug, Error)]
pub enum FormwerkError {
    // -- Request errors --
    #[error("No text provided")]
    EmptyInput,

    #[error("malformed HTTP request: {0}")]
    Http(String),

    #[error("request exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("request headers exceed {limit} bytes")]
    HeadersTooLarge { limit: usize },

    #[error("request not received within {secs}s")]
    RequestTimeout { secs: u64 },

    // -- Document errors --
    #[error("document assembly failed: {0}")]
    DocumentAssembly(String),

    #[error("image processing failed: {0}")]
    Image(String),

    #[error("archive write failed: {0}")]
    Archive(String),

    // -- Collaborators --
    #[error("branding fetch failed: {0}")]
    Branding(String),

    #[error("document server error: {0}")]
    Server(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormwerkError {
    /// HTTP status code a service boundary should answer with.
    ///
    /// Problems with what the client sent are 4xx; everything else is ours.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInput | Self::Http(_) => 400,
            Self::RequestTimeout { .. } => 408,
            Self::PayloadTooLarge { .. } => 413,
            Self::HeadersTooLarge { .. } => 431,
            _ => 500,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FormwerkError>;

/// Precondition check for the engine's caller: reject text that is empty
/// once surrounding whitespace is removed.
pub fn require_text(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        return Err(FormwerkError::EmptyInput);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(require_text(""), Err(FormwerkError::EmptyInput)));
        assert!(matches!(require_text(" \r\n\t "), Err(FormwerkError::EmptyInput)));
    }

    #[test]
    fn non_blank_text_passes_through_untouched() {
        assert_eq!(require_text("  # Title ").unwrap(), "  # Title ");
    }

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(FormwerkError::EmptyInput.status_code(), 400);
        assert_eq!(FormwerkError::Http("bad".into()).status_code(), 400);
        assert_eq!(FormwerkError::PayloadTooLarge { limit: 1 }.status_code(), 413);
        assert_eq!(FormwerkError::HeadersTooLarge { limit: 1 }.status_code(), 431);
        assert_eq!(FormwerkError::RequestTimeout { secs: 1 }.status_code(), 408);
        assert_eq!(
            FormwerkError::DocumentAssembly("zip".into()).status_code(),
            500
        );
    }
}
