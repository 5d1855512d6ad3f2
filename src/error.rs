//! Application error taxonomy.
//!
//! The HTTP client is the single point of classification; everything above it
//! (gateway, conversion engine, CLI) only ever sees these variants.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// A 2xx response body that failed to decode, or an error body that did
    /// not match the expected shape.
    #[error("failed to decode server response")]
    DecodingFailure,

    /// Transport-level failure: connectivity, DNS, timeout, bad URL.
    #[error("network unreachable")]
    NetworkUnreachable,

    /// Server-reported business error, decoded from a non-2xx body.
    #[error("{title}: {message} (HTTP {code})")]
    External {
        code: u16,
        message: String,
        title: String,
    },

    /// Anything that escaped classification.
    #[error("unknown error")]
    Unknown,
}

impl ApplicationError {
    /// Transient connectivity errors get a banner in the presentation layer;
    /// everything else a blocking dialog.
    pub fn is_network_unreachable(&self) -> bool {
        matches!(self, ApplicationError::NetworkUnreachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_display_includes_title_message_and_code() {
        let err = ApplicationError::External {
            code: 503,
            message: "try later".to_string(),
            title: "rate_unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "rate_unavailable: try later (HTTP 503)");
    }

    #[test]
    fn test_network_unreachable_predicate() {
        assert!(ApplicationError::NetworkUnreachable.is_network_unreachable());
        assert!(!ApplicationError::Unknown.is_network_unreachable());
    }
}
