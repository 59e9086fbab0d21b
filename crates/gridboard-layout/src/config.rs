#![forbid(unsafe_code)]

//! Grid configuration.
//!
//! All tunables of the engine live in one [`GridConfig`] that can be built in
//! code or, with the `config-file` feature, loaded from TOML or JSON.
//!
//! ```toml
//! # gridboard.toml
//! row_height = 40.0
//! min_rows = 20
//! buffer_rows = 5
//! ```
//!
//! Missing keys fall back to [`GridConfig::default`].

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rows::RowExpansionPolicy;

/// Default pixel height of one grid row.
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

/// Default minimum number of visible rows.
pub const DEFAULT_MIN_ROWS: u32 = 20;

/// Default number of extra rows added when the grid grows.
pub const DEFAULT_BUFFER_ROWS: u32 = 5;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Fixed pixel height of one row.
    pub row_height: f64,
    /// Lower bound on the grid's row count.
    pub min_rows: u32,
    /// Rows added past the requested row when the grid expands.
    pub buffer_rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            min_rows: DEFAULT_MIN_ROWS,
            buffer_rows: DEFAULT_BUFFER_ROWS,
        }
    }
}

impl GridConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, GridConfigError> {
        let config: Self = toml::from_str(s).map_err(GridConfigError::Toml)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GridConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, GridConfigError> {
        let config: Self = serde_json::from_str(s).map_err(GridConfigError::Json)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GridConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            errors.push(format!(
                "row_height must be a positive number, got {}",
                self.row_height
            ));
        }
        if self.min_rows == 0 {
            errors.push("min_rows must be > 0".into());
        }

        errors
    }

    /// Return `self` if valid, otherwise the collected validation errors.
    pub fn into_validated(self) -> Result<Self, GridConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(GridConfigError::Validation(errors))
        }
    }

    /// Row expansion policy described by this config.
    #[must_use]
    pub fn row_policy(&self) -> RowExpansionPolicy {
        RowExpansionPolicy {
            min_rows: self.min_rows,
            buffer_rows: self.buffer_rows,
        }
    }
}

/// Errors that can occur when loading a grid configuration.
#[derive(Debug)]
pub enum GridConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for GridConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        assert!(GridConfig::default().validate().is_empty());
    }

    #[test]
    fn default_row_policy_matches_constants() {
        let policy = GridConfig::default().row_policy();
        assert_eq!(policy.min_rows, DEFAULT_MIN_ROWS);
        assert_eq!(policy.buffer_rows, DEFAULT_BUFFER_ROWS);
    }

    #[test]
    fn validate_catches_bad_row_height() {
        for row_height in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let config = GridConfig {
                row_height,
                ..GridConfig::default()
            };
            assert_eq!(config.validate().len(), 1, "row_height {row_height}");
        }
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let config = GridConfig {
            row_height: 0.0,
            min_rows: 0,
            buffer_rows: 0,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "should catch both errors: {errors:?}");
        let err = config.into_validated().expect_err("invalid config");
        assert!(err.to_string().contains("min_rows"));
    }

    #[test]
    fn partial_json_preserves_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{ "buffer_rows": 8 }"#).expect("valid json");
        assert_eq!(config.buffer_rows, 8);
        assert_eq!(config.row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(config.min_rows, DEFAULT_MIN_ROWS);
    }
}
