//! Typed error hierarchy for cinder.
//!
//! Two enums cover the two places things can actually fail:
//! - `ConfigError` — configuration values outside their documented domain
//! - `SessionStoreError` — session persistence at the CLI boundary
//!
//! Expected compression outcomes (disabled, below threshold, nothing left to
//! reduce) are never errors; they are reported inside `CompressionResult`.

use thiserror::Error;

/// Configuration values outside their documented domain.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Compression threshold must be between 0 and 100, got {0}")]
    ThresholdOutOfRange(u8),

    #[error(
        "Unknown compression strategy '{0}'. Valid values: summary, sliding-window, importance"
    )]
    UnknownStrategy(String),
}

/// Failures while loading or persisting a session.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Failed to read session file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed session file: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_carries_offending_value() {
        let err = ConfigError::ThresholdOutOfRange(150);
        assert!(err.to_string().contains("150"));
    }

    #[test]
    fn unknown_strategy_lists_valid_values() {
        let err = ConfigError::UnknownStrategy("foo".to_string());
        let rendered = err.to_string();
        assert!(rendered.contains("foo"));
        assert!(rendered.contains("sliding-window"));
    }

    #[test]
    fn session_store_error_carries_path() {
        use std::path::PathBuf;
        let path = PathBuf::from("/tmp/session.json");
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SessionStoreError::Read {
            path: path.clone(),
            source: io_err,
        };
        match &err {
            SessionStoreError::Read { path: p, source: s } => {
                assert_eq!(p, &path);
                assert_eq!(s.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Read variant"),
        }
    }

    #[test]
    fn all_error_types_implement_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ConfigError::ThresholdOutOfRange(101));
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_std_error(&SessionStoreError::Malformed(serde_err));
    }
}
