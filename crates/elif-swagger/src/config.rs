use crate::{
    error::{SwaggerError, SwaggerResult},
    specification::{Contact, ExternalDocumentation, Info, License, SchemaObject, Tag},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Swagger version tag written into every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Default API title when the caller supplies none
pub const DEFAULT_TITLE: &str = "Swagger API";

/// Default API version when the caller supplies none
pub const DEFAULT_API_VERSION: &str = "0.0.1";

/// Default media type for `produces`/`consumes`
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Caller supplied settings for document assembly.
///
/// Every top-level field here overrides the fixed document defaults; unset
/// fields fall back to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwaggerConfig {
    /// API information, merged field by field over the defaults
    pub info: InfoConfig,

    /// Host serving the API
    pub host: Option<String>,

    /// Base path prepended to all paths
    pub base_path: Option<String>,

    /// Transfer protocols
    pub schemes: Vec<String>,

    /// Request media types, `application/json` when unset
    pub consumes: Option<Vec<String>>,

    /// Response media types, `application/json` when unset
    pub produces: Option<Vec<String>>,

    /// Global tags for grouping operations
    pub tags: Vec<TagConfig>,

    /// Extra top-level keys such as `x-*` vendor extensions
    pub extensions: BTreeMap<String, Value>,

    /// Tolerate unmapped leaf schemas in bodies and definitions too
    pub ignore_missing_mappings: bool,

    /// What to do when two different schemas share a model name
    pub collision_policy: CollisionPolicy,

    /// Wire fragments for application types (`LeafSchema::Custom`)
    pub custom_mappings: HashMap<String, SchemaObject>,
}

/// API information section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<ContactConfig>,
    pub license: Option<LicenseConfig>,
}

/// Contact information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
}

/// License information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    pub name: String,
    pub url: Option<String>,
}

/// Tag configuration for grouping operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocsConfig>,
}

/// External documentation reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDocsConfig {
    pub url: String,
    pub description: Option<String>,
}

/// Handling of model name collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The schema seen last wins
    #[default]
    Overwrite,
    /// Structurally different schemas under one name are an error
    Error,
}

impl SwaggerConfig {
    /// Create a new configuration with custom API info
    pub fn new(title: &str, version: &str) -> Self {
        let mut config = Self::default();
        config.info.title = Some(title.to_string());
        config.info.version = Some(version.to_string());
        config
    }

    /// Set the host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    /// Set the base path
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = Some(base_path.to_string());
        self
    }

    /// Set the API description
    pub fn with_description(mut self, description: &str) -> Self {
        self.info.description = Some(description.to_string());
        self
    }

    /// Replace the default media types
    pub fn with_media_types(mut self, consumes: &[&str], produces: &[&str]) -> Self {
        self.consumes = Some(consumes.iter().map(|s| s.to_string()).collect());
        self.produces = Some(produces.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Add a tag
    pub fn add_tag(mut self, name: &str, description: Option<&str>) -> Self {
        self.tags.push(TagConfig {
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            external_docs: None,
        });
        self
    }

    /// Add a top-level vendor extension
    pub fn add_extension(mut self, key: &str, value: Value) -> Self {
        self.extensions.insert(key.to_string(), value);
        self
    }

    /// Map an application type to a wire fragment
    pub fn with_custom_mapping(mut self, type_name: &str, schema: SchemaObject) -> Self {
        self.custom_mappings.insert(type_name.to_string(), schema);
        self
    }

    /// Tolerate unmapped leaves everywhere
    pub fn with_ignore_missing_mappings(mut self, ignore: bool) -> Self {
        self.ignore_missing_mappings = ignore;
        self
    }

    /// Choose how name collisions are handled
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(content: &str) -> SwaggerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML, YAML or JSON file, picked by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> SwaggerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            other => Err(SwaggerError::config_error(format!(
                "Unsupported configuration format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Resolved `info` block: caller values over the defaults
    pub fn resolve_info(&self) -> Info {
        Info {
            title: self
                .info
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            version: self
                .info
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            description: self.info.description.clone(),
            terms_of_service: self.info.terms_of_service.clone(),
            contact: self.info.contact.as_ref().map(|c| Contact {
                name: c.name.clone(),
                url: c.url.clone(),
                email: c.email.clone(),
            }),
            license: self.info.license.as_ref().map(|l| License {
                name: l.name.clone(),
                url: l.url.clone(),
            }),
        }
    }

    /// Resolved request media types
    pub fn resolve_consumes(&self) -> Vec<String> {
        self.consumes
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_MEDIA_TYPE.to_string()])
    }

    /// Resolved response media types
    pub fn resolve_produces(&self) -> Vec<String> {
        self.produces
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_MEDIA_TYPE.to_string()])
    }

    /// Convert tags
    pub fn resolve_tags(&self) -> Vec<Tag> {
        self.tags
            .iter()
            .map(|t| Tag {
                name: t.name.clone(),
                description: t.description.clone(),
                external_docs: t.external_docs.as_ref().map(|ed| ExternalDocumentation {
                    url: ed.url.clone(),
                    description: ed.description.clone(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_fill_unset_fields() {
        let config = SwaggerConfig::default();
        let info = config.resolve_info();

        assert_eq!(info.title, "Swagger API");
        assert_eq!(info.version, "0.0.1");
        assert_eq!(config.resolve_produces(), vec!["application/json"]);
        assert_eq!(config.resolve_consumes(), vec!["application/json"]);
    }

    #[test]
    fn test_caller_values_take_precedence() {
        let config = SwaggerConfig::new("Petstore", "1.2.3")
            .with_media_types(&["application/edn"], &["application/edn", "application/json"]);

        let info = config.resolve_info();
        assert_eq!(info.title, "Petstore");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(config.resolve_consumes(), vec!["application/edn"]);
        assert_eq!(config.resolve_produces().len(), 2);
    }

    #[test]
    fn test_info_merges_per_field() {
        let mut config = SwaggerConfig::default();
        config.info.title = Some("Only a title".to_string());

        let info = config.resolve_info();
        assert_eq!(info.title, "Only a title");
        assert_eq!(info.version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_toml_config() {
        let config = SwaggerConfig::from_toml_str(
            r#"
            host = "api.example.com"
            base_path = "/v1"
            ignore_missing_mappings = true
            collision_policy = "error"

            [info]
            title = "Petstore"
            "#,
        )
        .unwrap();

        assert_eq!(config.host.as_deref(), Some("api.example.com"));
        assert_eq!(config.base_path.as_deref(), Some("/v1"));
        assert!(config.ignore_missing_mappings);
        assert_eq!(config.collision_policy, CollisionPolicy::Error);
        assert_eq!(config.resolve_info().version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_config_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("swagger.yaml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "info:\n  title: From YAML\nschemes:\n  - https").unwrap();
        let config = SwaggerConfig::from_file(&yaml_path).unwrap();
        assert_eq!(config.resolve_info().title, "From YAML");
        assert_eq!(config.schemes, vec!["https"]);

        let unknown = dir.path().join("swagger.ini");
        fs::write(&unknown, "title = nope").unwrap();
        assert!(matches!(
            SwaggerConfig::from_file(&unknown),
            Err(SwaggerError::Config(_))
        ));
    }
}
