//! Resolver configuration.
//!
//! Controls the platform-specific parts of resolution: which platform name
//! environment exemptions are matched against, and the exemption list
//! itself.
//!
//! # Example YAML
//!
//! ```yaml
//! platform: windows
//! env_exemptions:
//!   - platform: windows
//!     key: PUBLIC
//!   - platform: linux
//!     key: HOSTNAME
//! ```

use serde::{Deserialize, Serialize};

use crate::find::{EnvExemption, standard_exemptions};

/// Configuration for a [`Resolver`](crate::Resolver).
///
/// # Examples
///
/// ```
/// use option_schema_core::{EnvExemption, ResolverConfig};
///
/// let config = ResolverConfig::default();
/// assert_eq!(config.platform(), std::env::consts::OS);
/// assert!(config.is_exempt("windows", "PUBLIC"));
///
/// let config = ResolverConfig::default()
///     .with_platform("linux")
///     .with_exemption(EnvExemption::new("linux", "HOSTNAME"));
/// assert_eq!(config.platform(), "linux");
/// assert!(config.is_exempt("linux", "hostname"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Platform name to match exemptions against. Defaults to the current
    /// platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Environment keys tolerated on options that forbid the environment.
    pub env_exemptions: Vec<EnvExemption>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            platform: None,
            env_exemptions: standard_exemptions(),
        }
    }
}

impl ResolverConfig {
    /// Effective platform name.
    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(std::env::consts::OS)
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_exemption(mut self, exemption: EnvExemption) -> Self {
        self.env_exemptions.push(exemption);
        self
    }

    /// Returns `true` if `key` is exempt on `platform`.
    pub fn is_exempt(&self, platform: &str, key: &str) -> bool {
        self.env_exemptions
            .iter()
            .any(|exemption| exemption.matches(platform, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_explicit_empty_exemptions_disable_standard_list() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"platform": "windows", "env_exemptions": []}"#).unwrap();
        assert_eq!(config.platform(), "windows");
        assert!(!config.is_exempt("windows", "PUBLIC"));
    }
}
