/*!
Wire encoding of schema nodes.

[`LeafEncoder`] maps scalar schemas to wire fragments. [`SchemaEncoder`]
walks containers and turns named composites into `$ref` links, carrying the
target version and the strict/relaxed mapping mode for one encoding pass.
*/

use crate::{
    error::{SwaggerError, SwaggerResult},
    schema::{ContainerKind, Field, LeafSchema, Schema},
    specification::SchemaObject,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// Dialect used for references and nullable leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecVersion {
    /// Bare model names as references, no nullable marker
    V1_2,
    /// `#/definitions/` references, `x-nullable` marker
    #[default]
    V2_0,
}

/// Behavior when a schema has no wire mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingMode {
    /// Unmapped schemas are errors
    #[default]
    Strict,
    /// Unmapped schemas are left out of the fragment
    Relaxed,
}

/// Maps leaf schemas to wire fragments
pub trait LeafEncoder {
    /// Fragment for a leaf, `None` when the leaf has no mapping
    fn encode_leaf(&self, leaf: &LeafSchema, version: SpecVersion) -> Option<SchemaObject>;

    /// Declared name of a schema
    fn name_of(&self, schema: &Schema) -> Option<String> {
        schema.name().map(str::to_string)
    }
}

/// Built-in scalar mappings plus caller supplied custom types
#[derive(Debug, Clone, Default)]
pub struct DefaultLeafEncoder {
    custom_mappings: HashMap<String, SchemaObject>,
}

impl DefaultLeafEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_mappings(custom_mappings: HashMap<String, SchemaObject>) -> Self {
        Self { custom_mappings }
    }

    /// Add custom type mapping
    pub fn with_custom_mapping(mut self, type_name: &str, schema: SchemaObject) -> Self {
        self.custom_mappings.insert(type_name.to_string(), schema);
        self
    }
}

impl LeafEncoder for DefaultLeafEncoder {
    fn encode_leaf(&self, leaf: &LeafSchema, version: SpecVersion) -> Option<SchemaObject> {
        let fragment = match leaf {
            LeafSchema::String => SchemaObject::typed("string"),
            LeafSchema::Int => SchemaObject::formatted("integer", "int32"),
            LeafSchema::Long => SchemaObject::formatted("integer", "int64"),
            LeafSchema::Float => SchemaObject::formatted("number", "float"),
            LeafSchema::Double => SchemaObject::formatted("number", "double"),
            LeafSchema::Boolean => SchemaObject::typed("boolean"),
            LeafSchema::Uuid => SchemaObject::formatted("string", "uuid"),
            LeafSchema::Date => SchemaObject::formatted("string", "date"),
            LeafSchema::DateTime => SchemaObject::formatted("string", "date-time"),
            LeafSchema::Pattern(pattern) => SchemaObject {
                pattern: Some(pattern.clone()),
                ..SchemaObject::typed("string")
            },
            LeafSchema::Enum(values) => SchemaObject {
                enum_values: values.iter().cloned().map(Value::String).collect(),
                ..SchemaObject::typed("string")
            },
            LeafSchema::Any => SchemaObject::default(),
            LeafSchema::Nullable(inner) => {
                let mut fragment = self.encode_leaf(inner, version)?;
                if version == SpecVersion::V2_0 {
                    fragment.x_nullable = Some(true);
                }
                fragment
            }
            LeafSchema::Custom(type_name) => self.custom_mappings.get(type_name)?.clone(),
        };
        Some(fragment)
    }
}

/// One encoding pass: leaf encoder, target version and mapping mode
#[derive(Clone, Copy)]
pub struct SchemaEncoder<'a> {
    leaf_encoder: &'a dyn LeafEncoder,
    version: SpecVersion,
    mode: MappingMode,
}

impl<'a> SchemaEncoder<'a> {
    pub fn new(leaf_encoder: &'a dyn LeafEncoder, version: SpecVersion, mode: MappingMode) -> Self {
        Self {
            leaf_encoder,
            version,
            mode,
        }
    }

    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    /// The same pass with unmapped schemas tolerated
    pub fn relaxed(&self) -> Self {
        Self {
            mode: MappingMode::Relaxed,
            ..*self
        }
    }

    pub fn leaf_encoder(&self) -> &'a dyn LeafEncoder {
        self.leaf_encoder
    }

    /// Reference string for a model
    pub fn reference(&self, name: &str) -> String {
        match self.version {
            SpecVersion::V2_0 => format!("#/definitions/{}", name),
            SpecVersion::V1_2 => name.to_string(),
        }
    }

    /// Encode any schema node.
    ///
    /// Named composites become references, containers become arrays. In
    /// relaxed mode an unmapped node yields `Ok(None)`; in strict mode it is an
    /// error.
    pub fn encode(&self, schema: &Schema) -> SwaggerResult<Option<SchemaObject>> {
        match schema {
            Schema::Leaf(leaf) => match self.leaf_encoder.encode_leaf(leaf, self.version) {
                Some(fragment) => Ok(Some(fragment)),
                None => self.unmapped(SwaggerError::unsupported_schema(format!(
                    "no wire mapping for leaf schema {}",
                    leaf
                ))),
            },
            Schema::Object(object) => match self.leaf_encoder.name_of(schema) {
                Some(name) => Ok(Some(SchemaObject {
                    description: object.description.clone(),
                    ..SchemaObject::reference(self.reference(&name))
                })),
                None => self.unmapped(SwaggerError::anonymous_model(format!(
                    "composite with fields [{}] has no name to reference",
                    object
                        .property_fields()
                        .filter_map(|f| f.key.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))),
            },
            Schema::Container(container) => {
                let Some(items) = self.encode(&container.item)? else {
                    return Ok(None);
                };
                Ok(Some(SchemaObject {
                    items: Some(Box::new(items)),
                    unique_items: (container.kind == ContainerKind::Set).then_some(true),
                    ..SchemaObject::typed("array")
                }))
            }
        }
    }

    /// Encode a field's schema and attach the field's own description
    pub fn encode_field(&self, field: &Field) -> SwaggerResult<Option<SchemaObject>> {
        let fragment = self.encode(&field.schema)?.map(|mut fragment| {
            if field.description.is_some() {
                fragment.description = field.description.clone();
            }
            fragment
        });
        Ok(fragment)
    }

    fn unmapped(&self, error: SwaggerError) -> SwaggerResult<Option<SchemaObject>> {
        match self.mode {
            MappingMode::Strict => Err(error),
            MappingMode::Relaxed => {
                trace!("Omitting unmapped schema: {}", error);
                Ok(None)
            }
        }
    }
}
