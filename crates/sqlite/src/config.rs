//! Provider configuration

use serde::{Deserialize, Serialize};

/// Top-level configuration for the SQLite provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// SQL dialect settings used by the translators
    pub dialect: DialectConfig,

    /// Value buffer materialization settings
    pub materialization: MaterializationConfig,
}

impl SqliteConfig {
    /// Create config optimized for testing
    pub fn for_testing() -> Self {
        Self {
            dialect: DialectConfig::default(),
            materialization: MaterializationConfig {
                shape_warning_threshold: 16,
            },
        }
    }
}

/// Settings that shape the SQL text emitted for date/time expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Format string passed to `strftime` when producing date/time values
    pub datetime_format: String,

    /// Whether `DateTime.Now` is evaluated with the `'localtime'` modifier
    pub now_uses_localtime: bool,

    /// Modifier appended when the result carries timezone semantics
    pub utc_modifier: String,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            now_uses_localtime: true,
            utc_modifier: "utc".to_string(),
        }
    }
}

/// Settings for the shape-keyed value buffer factory cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializationConfig {
    /// Number of distinct cached shapes at which a warning is logged.
    /// Shapes are never evicted; an unexpectedly large count usually means
    /// queries are being built dynamically per request.
    pub shape_warning_threshold: usize,
}

impl Default for MaterializationConfig {
    fn default() -> Self {
        Self {
            shape_warning_threshold: 10_000,
        }
    }
}
