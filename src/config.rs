//! Configuration Module
//!
//! Loads library settings from environment variables.

use std::env;

use crate::install::InstallPolicy;

/// Library configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Reject re-installation of an owner type instead of ignoring it
    pub strict_install: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LAZY_ATTRS_STRICT_INSTALL` - `true` or `false` (default: false)
    pub fn from_env() -> Self {
        Self {
            strict_install: env::var("LAZY_ATTRS_STRICT_INSTALL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    // == Install Policy ==
    /// Policy to pass to `install_with`.
    pub fn install_policy(&self) -> InstallPolicy {
        InstallPolicy::from_strict(self.strict_install)
    }
}
