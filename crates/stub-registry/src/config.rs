//! Resolver configuration.

use crate::query::DEFAULT_INTERNAL_HEADER;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Record which stubs have answered real requests
    #[serde(default = "default_true")]
    pub usage_tracking: bool,

    /// A non-matching stub only becomes the closest candidate when its rank
    /// is strictly greater than this value
    #[serde(default)]
    pub min_similarity: f64,

    /// Header that flags a request as internal (see `Resolver::query`)
    #[serde(default = "default_internal_header")]
    pub internal_header: String,
}

fn default_true() -> bool {
    true
}

fn default_internal_header() -> String {
    DEFAULT_INTERNAL_HEADER.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            usage_tracking: true,
            min_similarity: 0.0,
            internal_header: default_internal_header(),
        }
    }
}

impl RegistryConfig {
    /// Load from a YAML (or JSON) file and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        let config: RegistryConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(0.0..1.0).contains(&self.min_similarity) {
            anyhow::bail!(
                "minSimilarity must be within [0, 1), got {}",
                self.min_similarity
            );
        }

        if self.internal_header.trim().is_empty() {
            anyhow::bail!("internalHeader must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = RegistryConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert!(config.usage_tracking);
        assert_eq!(config.internal_header, DEFAULT_INTERNAL_HEADER);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
usageTracking: false
minSimilarity: 0.25
internalHeader: x-health-probe
"#;
        let config = RegistryConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.usage_tracking);
        assert_eq!(config.min_similarity, 0.25);
        assert_eq!(config.internal_header, "x-health-probe");
    }

    #[test]
    fn test_parse_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"minSimilarity": 0.5}}"#).unwrap();

        let config = RegistryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_similarity, 0.5);
        assert!(config.usage_tracking);
    }

    #[test]
    fn test_rejects_out_of_range_similarity() {
        let err = RegistryConfig::from_yaml_str("minSimilarity: 1.0").unwrap_err();
        assert!(err.to_string().contains("minSimilarity"));

        assert!(RegistryConfig::from_yaml_str("minSimilarity: -0.1").is_err());
    }

    #[test]
    fn test_rejects_empty_internal_header() {
        let err = RegistryConfig::from_yaml_str("internalHeader: '  '").unwrap_err();
        assert!(err.to_string().contains("internalHeader"));
    }

    #[test]
    fn test_missing_file() {
        assert!(RegistryConfig::from_file("/nonexistent/registry.yaml").is_err());
    }
}
