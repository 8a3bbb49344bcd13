use thiserror::Error;

/// Result type for Swagger generation
pub type SwaggerResult<T> = Result<T, SwaggerError>;

/// Errors that can occur while turning schemas into a Swagger document
#[derive(Debug, Error)]
pub enum SwaggerError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path template pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A leaf schema the encoder has no wire mapping for
    #[error("Unsupported schema: {0}")]
    UnsupportedSchema(String),

    /// A composite schema that needs a `$ref` but carries no name
    #[error("Anonymous model: {0}")]
    AnonymousModel(String),

    /// A non-body parameter group that is not a keyed composite
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Two different schemas registered under one model name
    #[error("Duplicate model: {0}")]
    DuplicateModel(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwaggerError {
    /// Create a new unsupported schema error
    pub fn unsupported_schema<T: ToString>(msg: T) -> Self {
        Self::UnsupportedSchema(msg.to_string())
    }

    /// Create a new anonymous model error
    pub fn anonymous_model<T: ToString>(msg: T) -> Self {
        Self::AnonymousModel(msg.to_string())
    }

    /// Create a new invalid parameters error
    pub fn invalid_parameters<T: ToString>(msg: T) -> Self {
        Self::InvalidParameters(msg.to_string())
    }

    /// Create a new duplicate model error
    pub fn duplicate_model<T: ToString>(msg: T) -> Self {
        Self::DuplicateModel(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }
}
