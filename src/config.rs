//! Analysis configuration.
//!
//! Configuration comes from an optional YAML file merged with command-line
//! overrides. Everything is optional: with no configuration at all the
//! component analyzer runs in degenerate single-root mode and the API
//! extractors search the tree for descriptors themselves.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyze::{ConsumeConfig, OfferConfig};
use crate::error::ConfigError;

/// Service identity used to label reports when none is configured.
pub const UNSPECIFIED_SERVICE: &str = "unspecified";

/// Full configuration for one analysis run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Component roots and their granularity depth. Empty means degenerate
    /// single-root mode.
    #[serde(default)]
    pub whitelist: BTreeMap<String, u32>,
    /// Component prefixes excluded from the dependency graph entirely.
    #[serde(default)]
    pub blacklist: BTreeSet<String>,
    /// Explicit API base path; overrides every descriptor source.
    #[serde(default)]
    pub context_path: Option<String>,
    /// Explicit container-descriptor file.
    #[serde(default)]
    pub descriptor_file: Option<PathBuf>,
    /// Identity tag used to label this module's reports, usually
    /// `group:artifact:version`.
    #[serde(default)]
    pub service: Option<String>,
    /// Fully-qualified name of the consumption marker annotation.
    #[serde(default)]
    pub consumes_marker: Option<String>,
}

impl AnalysisConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse one `COMPONENT=DEPTH` whitelist entry.
    pub fn parse_whitelist_entry(entry: &str) -> Result<(String, u32), ConfigError> {
        let invalid = || ConfigError::InvalidWhitelistEntry {
            entry: entry.to_string(),
        };
        let (name, depth) = entry.split_once('=').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let depth: u32 = depth.trim().parse().map_err(|_| invalid())?;
        Ok((name.to_string(), depth))
    }

    /// The offer-extractor view of this configuration.
    pub fn offer_config(&self) -> OfferConfig {
        OfferConfig {
            context_path: self.context_path.clone(),
            descriptor_file: self.descriptor_file.clone(),
        }
    }

    /// The consumption-extractor view of this configuration.
    pub fn consume_config(&self) -> ConsumeConfig {
        match &self.consumes_marker {
            Some(marker) => ConsumeConfig {
                marker_import: marker.clone(),
            },
            None => ConsumeConfig::default(),
        }
    }

    /// The identity tag to label reports with.
    pub fn service_identity(&self) -> &str {
        self.service.as_deref().unwrap_or(UNSPECIFIED_SERVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whitelist_entry() {
        assert_eq!(
            AnalysisConfig::parse_whitelist_entry("com.app=2").unwrap(),
            ("com.app".to_string(), 2)
        );
        assert_eq!(
            AnalysisConfig::parse_whitelist_entry(" com.app = 0 ").unwrap(),
            ("com.app".to_string(), 0)
        );
        assert!(AnalysisConfig::parse_whitelist_entry("com.app").is_err());
        assert!(AnalysisConfig::parse_whitelist_entry("com.app=-1").is_err());
        assert!(AnalysisConfig::parse_whitelist_entry("=2").is_err());
    }

    #[test]
    fn test_parse_yaml_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("archmap.yaml");
        fs::write(
            &path,
            r#"
whitelist:
  com.app: 2
  com.shared: 1
blacklist:
  - com.app.legacy
context_path: /shop
service: com.shop:backend:1.0.0
"#,
        )
        .unwrap();

        let config = AnalysisConfig::parse_file(&path).unwrap();
        assert_eq!(config.whitelist["com.app"], 2);
        assert!(config.blacklist.contains("com.app.legacy"));
        assert_eq!(config.context_path.as_deref(), Some("/shop"));
        assert_eq!(config.service_identity(), "com.shop:backend:1.0.0");
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.whitelist.is_empty());
        assert_eq!(config.service_identity(), UNSPECIFIED_SERVICE);
        assert_eq!(
            config.consume_config().marker_import,
            "annotation.ConsumesAPI"
        );
    }
}
