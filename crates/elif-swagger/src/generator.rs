use crate::{
    collector::collect_surface_models,
    config::{SwaggerConfig, SWAGGER_VERSION},
    encoder::{DefaultLeafEncoder, LeafEncoder, MappingMode, SchemaEncoder, SpecVersion},
    error::SwaggerResult,
    namer::{intrinsic_names, name_root_avoiding},
    parameters::convert_parameters,
    renderer::render_model,
    responses::convert_responses,
    routes::{ApiSurface, Operation},
    schema::Schema,
    specification::{OperationObject, PathItem, SchemaObject, SwaggerDocument},
    utils::PathTemplates,
    validation::{validate_document, ValidationReport},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Top-level keys owned by the document itself
const RESERVED_KEYS: &[&str] = &[
    "swagger",
    "info",
    "host",
    "basePath",
    "schemes",
    "consumes",
    "produces",
    "paths",
    "definitions",
    "tags",
];

/// Assembles Swagger 2.0 documents from an API surface
pub struct SwaggerGenerator {
    /// Configuration
    config: SwaggerConfig,
    /// Leaf schema mappings
    leaf_encoder: Box<dyn LeafEncoder>,
    /// Path template rewriting
    templates: PathTemplates,
}

impl SwaggerGenerator {
    /// Create a new generator using the built-in leaf encoder
    pub fn new(config: SwaggerConfig) -> SwaggerResult<Self> {
        let leaf_encoder = DefaultLeafEncoder::with_custom_mappings(config.custom_mappings.clone());
        Ok(Self {
            leaf_encoder: Box::new(leaf_encoder),
            templates: PathTemplates::new()?,
            config,
        })
    }

    /// Replace the leaf encoder
    pub fn with_leaf_encoder(mut self, leaf_encoder: impl LeafEncoder + 'static) -> Self {
        self.leaf_encoder = Box::new(leaf_encoder);
        self
    }

    pub fn config(&self) -> &SwaggerConfig {
        &self.config
    }

    /// Encoding pass used for one assembly
    fn encoder(&self) -> SchemaEncoder<'_> {
        let mode = if self.config.ignore_missing_mappings {
            MappingMode::Relaxed
        } else {
            MappingMode::Strict
        };
        SchemaEncoder::new(self.leaf_encoder.as_ref(), SpecVersion::V2_0, mode)
    }

    /// Build the document for `surface`
    pub fn assemble(&self, surface: &ApiSurface) -> SwaggerResult<SwaggerDocument> {
        let encoder = self.encoder();
        let surface = normalize_routes(surface);

        let paths = self.convert_paths(&surface, &encoder)?;
        let definitions = self.render_definitions(&surface, &encoder)?;

        debug!(
            "Assembled document with {} paths and {} definitions",
            paths.len(),
            definitions.len()
        );

        Ok(SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.config.resolve_info(),
            host: self.config.host.clone(),
            base_path: self.config.base_path.clone(),
            schemes: self.config.schemes.clone(),
            consumes: self.config.resolve_consumes(),
            produces: self.config.resolve_produces(),
            paths,
            definitions,
            tags: self.config.resolve_tags(),
            extensions: self.extensions(),
        })
    }

    /// Rendered definitions of every model reachable from bodies and responses
    pub fn definitions(&self, surface: &ApiSurface) -> SwaggerResult<BTreeMap<String, SchemaObject>> {
        self.render_definitions(&normalize_routes(surface), &self.encoder())
    }

    /// Assemble, then check the result
    pub fn assemble_and_validate(&self, surface: &ApiSurface) -> SwaggerResult<(SwaggerDocument, ValidationReport)> {
        let document = self.assemble(surface)?;
        let report = validate_document(&document)?;
        Ok((document, report))
    }

    fn convert_paths(
        &self,
        surface: &ApiSurface,
        encoder: &SchemaEncoder<'_>,
    ) -> SwaggerResult<BTreeMap<String, PathItem>> {
        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();

        for (path, method, operation) in surface.operations() {
            let converted = self.convert_operation(operation, encoder)?;
            paths
                .entry(self.templates.swagger_path(path))
                .or_default()
                .insert(method, converted);
        }

        Ok(paths)
    }

    fn convert_operation(&self, operation: &Operation, encoder: &SchemaEncoder<'_>) -> SwaggerResult<OperationObject> {
        Ok(OperationObject {
            tags: operation.tags.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            operation_id: operation.operation_id.clone(),
            consumes: operation.consumes.clone(),
            produces: operation.produces.clone(),
            parameters: convert_parameters(&operation.parameters, encoder)?,
            responses: convert_responses(&operation.responses, encoder)?,
            deprecated: operation.deprecated.then_some(true),
        })
    }

    fn render_definitions(
        &self,
        surface: &ApiSurface,
        encoder: &SchemaEncoder<'_>,
    ) -> SwaggerResult<BTreeMap<String, SchemaObject>> {
        let mut definitions = BTreeMap::new();
        for (name, model) in collect_surface_models(surface, self.config.collision_policy)? {
            definitions.insert(name, render_model(&model, encoder)?);
        }
        Ok(definitions)
    }

    fn extensions(&self) -> BTreeMap<String, serde_json::Value> {
        self.config
            .extensions
            .iter()
            .filter(|(key, _)| {
                let reserved = RESERVED_KEYS.contains(&key.as_str());
                if reserved {
                    warn!("Ignoring extension '{}': the document owns that key", key);
                }
                !reserved
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Give every body and response model root a name.
///
/// Anonymous roots get a generated `Body<n>`/`Response<n>` name and their
/// anonymous sub-schemas are named from it, so parameter references and
/// definitions agree. Generated names skip every intrinsic model name found
/// in the surface. Roots that already have names are left as they are,
/// which makes normalization idempotent.
pub fn normalize_routes(surface: &ApiSurface) -> ApiSurface {
    let mut taken = BTreeSet::new();
    for (_, _, operation) in surface.operations() {
        for root in operation.model_roots() {
            intrinsic_names(root, &mut taken);
        }
    }

    let mut normalized = surface.clone();

    for methods in normalized.routes.values_mut() {
        for operation in methods.values_mut() {
            if let Some(body) = operation.parameters.body.as_mut() {
                *body = name_model_root(body, "body", &taken);
            }
            for response in operation.responses.values_mut() {
                if let Some(schema) = response.schema.as_mut() {
                    *schema = name_model_root(schema, "response", &taken);
                }
            }
        }
    }

    normalized
}

fn name_model_root(schema: &Schema, prefix: &str, taken: &BTreeSet<String>) -> Schema {
    match schema.peek() {
        Schema::Object(_) => name_root_avoiding(schema, prefix, taken),
        _ => schema.clone(),
    }
}

/// Assemble a document with the built-in leaf encoder
pub fn assemble(surface: &ApiSurface, config: SwaggerConfig) -> SwaggerResult<SwaggerDocument> {
    SwaggerGenerator::new(config)?.assemble(surface)
}
