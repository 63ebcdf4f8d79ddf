//! Configuration errors
//!
//! The simulation itself never fails; numeric trouble is clamped in place.
//! Only loading and validating [`crate::Settings`] can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings from {}: {source}", .path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON was malformed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A tunable is outside the range the integrator can handle
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What the value must satisfy
        reason: &'static str,
    },
}
