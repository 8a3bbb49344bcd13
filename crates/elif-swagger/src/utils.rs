/*!
Path template handling and document file helpers.
*/

use crate::{error::SwaggerResult, specification::SwaggerDocument};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Rewrites route templates into Swagger form and reads their parameters
#[derive(Debug, Clone)]
pub struct PathTemplates {
    /// `:name` segments of route templates
    colon_param_regex: Regex,
    /// `{name}` segments of Swagger paths
    brace_param_regex: Regex,
}

impl PathTemplates {
    pub fn new() -> SwaggerResult<Self> {
        Ok(Self {
            colon_param_regex: Regex::new(r":([^/]+)")?,
            brace_param_regex: Regex::new(r"\{([^}]+)\}")?,
        })
    }

    /// Rewrite `:id` segments to `{id}`; nothing else changes
    pub fn swagger_path(&self, path: &str) -> String {
        self.colon_param_regex.replace_all(path, "{$1}").into_owned()
    }

    /// Parameter names templated into a Swagger path, in order
    pub fn template_params(&self, path: &str) -> Vec<String> {
        self.brace_param_regex
            .captures_iter(path)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Output format for saving documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Save a document to file
pub fn save_document_to_file<P: AsRef<Path>>(
    document: &SwaggerDocument,
    path: P,
    format: OutputFormat,
    pretty: bool,
) -> SwaggerResult<()> {
    let content = match format {
        OutputFormat::Json => document.to_json(pretty)?,
        OutputFormat::Yaml => document.to_yaml()?,
    };

    fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Load a document from a JSON or YAML file
pub fn load_document_from_file<P: AsRef<Path>>(path: P) -> SwaggerResult<SwaggerDocument> {
    let content = fs::read_to_string(path.as_ref())?;

    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => Ok(serde_json::from_str(&content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        _ => {
            // Try to detect format from content
            if content.trim_start().starts_with('{') {
                Ok(serde_json::from_str(&content)?)
            } else {
                Ok(serde_yaml::from_str(&content)?)
            }
        }
    }
}
