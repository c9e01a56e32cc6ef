use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the document service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service reported an error: {0}")]
    Api(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("node '{0}' is missing from the response")]
    NodeNotFound(String),

    #[error("node '{0}' has no component index")]
    MissingComponents(String),

    #[error("no svg url resolved for component '{0}'")]
    MissingSvgUrl(String),
}

/// Errors raised while turning nodes into token records.
///
/// Apart from `Upstream`, none of these leave the extractor that produced them: they are
/// logged and the offending record is dropped.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed {kind} node '{name}': {reason}")]
    MalformedNode {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("invalid token name '{name}': {reason}")]
    InvalidTokenName { name: String, reason: String },

    #[error("failed to fetch icon '{id}': {source}")]
    IconFetch {
        id: String,
        #[source]
        source: UpstreamError,
    },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl TokenError {
    pub fn malformed(
        kind: &'static str,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedNode {
            kind,
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTokenName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_fetch_keeps_upstream_cause() {
        let err = TokenError::IconFetch {
            id: "1:2".to_string(),
            source: UpstreamError::MissingSvgUrl("1:2".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch icon '1:2': no svg url resolved for component '1:2'"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn upstream_is_transparent() {
        let err = TokenError::from(UpstreamError::NodeNotFound("4:5".to_string()));
        assert_eq!(err.to_string(), "node '4:5' is missing from the response");
    }
}
