use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path, time::Duration};

use crate::{classify::TypeModel, error::SdsError, node::Category};

/// Deepest level a category node may be configured at.
pub const MAX_CATEGORY_LEVEL: u32 = 1024;

/// Pipeline settings. Every field has a default, so partial TOML files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdsConfig {
    /// Deadline for the RDF parser to deliver its terminal signal.
    pub parse_timeout_secs: u64,
    /// Horizontal distance between neighboring nodes on a level.
    pub node_spacing: f64,
    /// Catalog entries whose basename matches this pattern are never merged into the graph.
    pub temp_file_pattern: String,
    pub subjects_level: u32,
    pub protocols_level: u32,
    pub contributors_level: u32,
    pub types: TypeModel,
}

impl Default for SdsConfig {
    fn default() -> Self {
        SdsConfig {
            parse_timeout_secs: 30,
            node_spacing: 100.0,
            temp_file_pattern: r"\.tmp".to_string(),
            subjects_level: 2,
            protocols_level: 2,
            contributors_level: 2,
            types: TypeModel::default(),
        }
    }
}

impl SdsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, SdsError> {
        let config: SdsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SdsError> {
        tracing::debug!("Reading config from {:?}", path.as_ref());
        let content = read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, SdsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn parse_timeout(&self) -> Duration {
        Duration::from_secs(self.parse_timeout_secs)
    }

    pub fn category_level(&self, category: Category) -> u32 {
        match category {
            Category::Subjects => self.subjects_level,
            Category::Protocols => self.protocols_level,
            Category::Contributors => self.contributors_level,
        }
    }

    pub fn temp_file_regex(&self) -> Result<Regex, SdsError> {
        Ok(Regex::new(&self.temp_file_pattern)?)
    }

    fn validate(&self) -> Result<(), SdsError> {
        self.temp_file_regex()?;
        if self.parse_timeout_secs == 0 {
            return Err(SdsError::Config(
                "parse_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.node_spacing <= 0.0 {
            return Err(SdsError::Config(format!(
                "node_spacing must be positive, got {}",
                self.node_spacing
            )));
        }
        for (name, level) in [
            ("subjects_level", self.subjects_level),
            ("protocols_level", self.protocols_level),
            ("contributors_level", self.contributors_level),
        ] {
            if !(2..=MAX_CATEGORY_LEVEL).contains(&level) {
                return Err(SdsError::Config(format!(
                    "{name} must lie between 2 and {MAX_CATEGORY_LEVEL}, got {level}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SemanticType;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SdsConfig::from_toml_str(
            r#"
node_spacing = 50.0

[types.individuals]
lab = "Person"
"#,
        )
        .expect("valid config");
        assert_eq!(config.node_spacing, 50.0);
        assert_eq!(config.parse_timeout_secs, 30);
        assert_eq!(
            config.types.individuals.get("lab"),
            Some(&SemanticType::Person)
        );
        assert_eq!(config.types.vocabulary_prefix, "sparc");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SdsConfig::from_toml_str("temp_file_pattern = \"(\""),
            Err(SdsError::Config(_))
        ));
        assert!(matches!(
            SdsConfig::from_toml_str("subjects_level = 1"),
            Err(SdsError::Config(_))
        ));
        assert!(matches!(
            SdsConfig::from_toml_str("parse_timeout_secs = 0"),
            Err(SdsError::Config(_))
        ));
        assert!(matches!(
            SdsConfig::from_toml_str("contributors_level = 4294967295"),
            Err(SdsError::Config(_))
        ));
        assert!(SdsConfig::from_toml_str("protocols_level = 1024").is_ok());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = SdsConfig::default().to_toml_string().expect("serializable");
        let config = SdsConfig::from_toml_str(&text).expect("parsable");
        assert_eq!(config, SdsConfig::default());
    }
}
