// ── Txfeed Atoms: Error Types ──────────────────────────────────────────────
// Single canonical error enum for the history pipeline, built with `thiserror`.
//
// Design rules:
//   • One variant per caller-distinguishable failure class (validation,
//     chain/credential resolution, the three upstream failure modes).
//   • The `#[from]` attribute wires external error conversions automatically.
//   • No variant carries secret material (API keys, endpoint URLs embedding
//     them) in its message — see the `reqwest::Error` conversion.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HistoryError {
    /// Address is not `0x` followed by 40 hex characters.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Requested page size is zero or negative.
    #[error("Invalid page size: {0} (must be a positive integer)")]
    InvalidPageSize(i64),

    /// Chain id is not in the registry.
    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),

    /// The named credential key is unset. The message names the key only,
    /// never a value.
    #[error("Missing credential: {0} is not configured")]
    MissingCredential(String),

    /// Network-level failure or non-success HTTP status from upstream.
    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),

    /// Upstream body was not parseable into the expected envelope.
    #[error("Upstream returned a malformed response: {0}")]
    UpstreamMalformed(String),

    /// Upstream replied with an embedded error envelope. Its message is
    /// passed through — it originates from a trusted-but-external service.
    #[error("Upstream error: {0}")]
    UpstreamProtocol(String),

    /// JSON serialization / deserialization failure inside the pipeline.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

// ── Conversions ────────────────────────────────────────────────────────────

// The request URL embeds the provider credential as a path segment, and
// `reqwest::Error`'s display includes the URL. Strip it before the message
// can reach a log line or a caller.
impl From<reqwest::Error> for HistoryError {
    fn from(e: reqwest::Error) -> Self {
        HistoryError::UpstreamTransport(e.without_url().to_string())
    }
}

impl From<String> for HistoryError {
    fn from(s: String) -> Self {
        HistoryError::Other(s)
    }
}

impl From<&str> for HistoryError {
    fn from(s: &str) -> Self {
        HistoryError::Other(s.to_string())
    }
}

// ── Client-facing rendering ────────────────────────────────────────────────

impl HistoryError {
    /// Message safe to surface to the API caller. Taxonomy variants render
    /// their descriptive text; unexpected internal errors collapse to a
    /// generic message instead of leaking detail.
    pub fn public_message(&self) -> String {
        match self {
            HistoryError::Serialization(_) | HistoryError::Other(_) => {
                "Failed to build transfer history".to_string()
            }
            other => other.to_string(),
        }
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All pipeline operations return this type.
pub type HistoryResult<T> = Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_message_passes_taxonomy_through() {
        let e = HistoryError::UnsupportedChain(999);
        assert_eq!(e.public_message(), "Unsupported chain id: 999");
        let e = HistoryError::UpstreamProtocol("rate limited".into());
        assert_eq!(e.public_message(), "Upstream error: rate limited");
    }

    #[test]
    fn public_message_hides_internal_detail() {
        let e = HistoryError::Other("lock poisoned at pipeline.rs:42".into());
        assert_eq!(e.public_message(), "Failed to build transfer history");
    }

    #[test]
    fn missing_credential_names_key_only() {
        let e = HistoryError::MissingCredential("ALCHEMY_API_KEY".into());
        assert!(e.to_string().contains("ALCHEMY_API_KEY"));
        assert!(!e.to_string().contains("secret"));
    }
}
