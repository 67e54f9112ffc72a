//! Compression configuration and strategy selection.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

use super::DEFAULT_COMPRESSION_THRESHOLD;

/// The closed set of compression strategies.
///
/// The set is fixed by design; each variant dispatches to a distinct pure
/// function in the engine rather than an open plugin interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionStrategy {
    /// Replace the droppable prefix with one synthetic summary message.
    #[default]
    Summary,
    /// Drop oldest messages first until usage falls below the threshold.
    SlidingWindow,
    /// Drop lowest-scoring messages first, keeping errors and code context.
    Importance,
}

impl std::fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionStrategy::Summary => write!(f, "summary"),
            CompressionStrategy::SlidingWindow => write!(f, "sliding-window"),
            CompressionStrategy::Importance => write!(f, "importance"),
        }
    }
}

impl std::str::FromStr for CompressionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(CompressionStrategy::Summary),
            "sliding-window" | "sliding_window" => Ok(CompressionStrategy::SlidingWindow),
            "importance" => Ok(CompressionStrategy::Importance),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Per-session compression settings.
///
/// Owned by the session's configuration and immutable during a compression
/// run. Every field has a serde default so a partial `[compression]` table
/// in `cinder.toml` fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Master switch; when false every check reports `compressed: false`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Usage percentage (0-100) at which compression triggers.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Which strategy reduces the conversation.
    #[serde(default)]
    pub strategy: CompressionStrategy,
    /// When true, tool call/result pairs are never removed.
    #[serde(default)]
    pub preserve_tool_history: bool,
    /// Trailing messages that always survive verbatim.
    #[serde(default = "default_preserve_recent")]
    pub preserve_recent_messages: usize,
    /// Ask the caller to warn the user before compressing.
    #[serde(default)]
    pub notify_before_compression: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_threshold() -> u8 {
    DEFAULT_COMPRESSION_THRESHOLD
}

fn default_preserve_recent() -> usize {
    10
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            threshold: default_threshold(),
            strategy: CompressionStrategy::default(),
            preserve_tool_history: false,
            preserve_recent_messages: default_preserve_recent(),
            notify_before_compression: false,
        }
    }
}

impl CompressionConfig {
    /// Reject values outside their documented domain.
    ///
    /// Expected compression outcomes are data, never errors; a threshold
    /// above 100 is a configuration defect and fails loudly instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressionConfig::default();
        assert!(config.enabled);
        assert_eq!(config.threshold, 80);
        assert_eq!(config.strategy, CompressionStrategy::Summary);
        assert_eq!(config.preserve_recent_messages, 10);
        assert!(!config.preserve_tool_history);
        assert!(!config.notify_before_compression);
    }

    #[test]
    fn test_strategy_parse_and_display() {
        for strategy in [
            CompressionStrategy::Summary,
            CompressionStrategy::SlidingWindow,
            CompressionStrategy::Importance,
        ] {
            let parsed: CompressionStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert!("drop-everything".parse::<CompressionStrategy>().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: CompressionConfig = toml::from_str("threshold = 60").unwrap();
        assert_eq!(config.threshold, 60);
        assert!(config.enabled);
        assert_eq!(config.strategy, CompressionStrategy::Summary);
    }

    #[test]
    fn test_strategy_from_toml() {
        let config: CompressionConfig =
            toml::from_str("strategy = \"sliding-window\"").unwrap();
        assert_eq!(config.strategy, CompressionStrategy::SlidingWindow);
    }

    #[test]
    fn test_validate_rejects_threshold_over_100() {
        let config = CompressionConfig {
            threshold: 150,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(CompressionConfig::default().validate().is_ok());
    }
}
