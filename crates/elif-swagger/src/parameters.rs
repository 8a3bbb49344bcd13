/*!
Conversion of per-location parameter groups into wire parameters.
*/

use crate::{
    encoder::{MappingMode, SchemaEncoder},
    error::{SwaggerError, SwaggerResult},
    routes::Parameters,
    schema::{ContainerKind, Schema},
    specification::{ParameterLocation, ParameterObject, SchemaObject},
};
use tracing::debug;

/// Parameter group classified by location and body shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterShape<'a> {
    /// Body holding a sequence of the given element
    BodySequence(&'a Schema),
    /// Body holding a set of the given element
    BodySet(&'a Schema),
    /// Body holding the given schema directly
    BodySingle(&'a Schema),
    /// Keyed composite whose fields are individual parameters
    NonBody(ParameterLocation, &'a Schema),
}

impl<'a> ParameterShape<'a> {
    /// Classify a body schema
    pub fn body(schema: &'a Schema) -> Self {
        match schema {
            Schema::Container(container) => match container.kind {
                ContainerKind::Sequence => ParameterShape::BodySequence(&container.item),
                ContainerKind::Set => ParameterShape::BodySet(&container.item),
            },
            other => ParameterShape::BodySingle(other),
        }
    }

    /// All groups of an operation, body first
    pub fn classify(parameters: &'a Parameters) -> Vec<Self> {
        parameters
            .body
            .iter()
            .map(ParameterShape::body)
            .chain(
                parameters
                    .non_body()
                    .map(|(location, schema)| ParameterShape::NonBody(location, schema)),
            )
            .collect()
    }
}

/// Convert every parameter group of an operation.
///
/// Absent locations produce nothing. A body whose model has no name is
/// dropped.
pub fn convert_parameters(
    parameters: &Parameters,
    encoder: &SchemaEncoder<'_>,
) -> SwaggerResult<Vec<ParameterObject>> {
    let mut converted = Vec::new();
    for shape in ParameterShape::classify(parameters) {
        converted.extend(convert_shape(shape, encoder)?);
    }
    Ok(converted)
}

fn convert_shape(shape: ParameterShape<'_>, encoder: &SchemaEncoder<'_>) -> SwaggerResult<Vec<ParameterObject>> {
    match shape {
        ParameterShape::BodySequence(item) => Ok(body_array(item, false, encoder)?.into_iter().collect()),
        ParameterShape::BodySet(item) => Ok(body_array(item, true, encoder)?.into_iter().collect()),
        ParameterShape::BodySingle(model) => Ok(body_single(model, encoder)?.into_iter().collect()),
        ParameterShape::NonBody(location, schema) => non_body(location, schema, encoder),
    }
}

fn body_array(item: &Schema, unique: bool, encoder: &SchemaEncoder<'_>) -> SwaggerResult<Option<ParameterObject>> {
    let Some(name) = encoder.leaf_encoder().name_of(item) else {
        debug!("Dropping body parameter: array element has no model name");
        return Ok(None);
    };
    let Some(items) = encoder.encode(item)? else {
        return Ok(None);
    };

    Ok(Some(body_parameter(
        name,
        items.description.clone(),
        SchemaObject {
            items: Some(Box::new(items.without_description())),
            unique_items: unique.then_some(true),
            ..SchemaObject::typed("array")
        },
    )))
}

fn body_single(model: &Schema, encoder: &SchemaEncoder<'_>) -> SwaggerResult<Option<ParameterObject>> {
    let Some(name) = encoder.leaf_encoder().name_of(model) else {
        debug!("Dropping body parameter: schema has no model name");
        return Ok(None);
    };
    let Some(fragment) = encoder.encode(model)? else {
        return Ok(None);
    };

    Ok(Some(body_parameter(
        name,
        fragment.description.clone(),
        fragment.without_description(),
    )))
}

fn body_parameter(name: String, description: Option<String>, schema: SchemaObject) -> ParameterObject {
    ParameterObject {
        location: ParameterLocation::Body,
        name,
        required: true,
        schema: Some(schema),
        fragment: SchemaObject {
            description,
            ..Default::default()
        },
    }
}

fn non_body(
    location: ParameterLocation,
    schema: &Schema,
    encoder: &SchemaEncoder<'_>,
) -> SwaggerResult<Vec<ParameterObject>> {
    let Schema::Object(object) = schema else {
        return Err(SwaggerError::invalid_parameters(format!(
            "{:?} parameters must be a keyed composite",
            location
        )));
    };

    let mut converted = Vec::new();
    for field in object.property_fields() {
        let Some(name) = field.key.name() else {
            continue;
        };
        if !is_inline(&field.schema) {
            match encoder.mode() {
                MappingMode::Strict => {
                    return Err(SwaggerError::invalid_parameters(format!(
                        "{:?} parameter '{}' must be a leaf or a container of leaves",
                        location, name
                    )));
                }
                MappingMode::Relaxed => {
                    debug!("Skipping {:?} parameter '{}': composite value", location, name);
                    continue;
                }
            }
        }
        let Some(fragment) = encoder.encode_field(field)? else {
            continue;
        };
        converted.push(ParameterObject {
            location,
            name: name.to_string(),
            required: !field.key.is_optional(),
            schema: None,
            fragment,
        });
    }
    Ok(converted)
}

/// Non-body parameters carry their type inline, so composites are out
fn is_inline(schema: &Schema) -> bool {
    match schema {
        Schema::Leaf(_) => true,
        Schema::Container(container) => is_inline(&container.item),
        Schema::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{DefaultLeafEncoder, MappingMode, SpecVersion};
    use crate::schema::{Field, FieldKey, LeafSchema, ObjectSchema, PredicateKey};
    use serde_json::{json, Value};

    fn convert(parameters: &Parameters) -> SwaggerResult<Value> {
        let leaf_encoder = DefaultLeafEncoder::new();
        let encoder = SchemaEncoder::new(&leaf_encoder, SpecVersion::V2_0, MappingMode::Strict);
        Ok(serde_json::to_value(convert_parameters(parameters, &encoder)?).unwrap())
    }

    fn pet() -> ObjectSchema {
        ObjectSchema::named("Pet").required("id", LeafSchema::Long)
    }

    #[test]
    fn test_sequence_body() {
        let parameters = Parameters {
            body: Some(Schema::sequence(pet())),
            ..Default::default()
        };

        assert_eq!(
            convert(&parameters).unwrap(),
            json!([{
                "in": "body",
                "name": "Pet",
                "required": true,
                "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}}
            }])
        );
    }

    #[test]
    fn test_set_body() {
        let parameters = Parameters {
            body: Some(Schema::set(pet().with_description("A pet"))),
            ..Default::default()
        };

        assert_eq!(
            convert(&parameters).unwrap(),
            json!([{
                "in": "body",
                "name": "Pet",
                "required": true,
                "description": "A pet",
                "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}, "uniqueItems": true}
            }])
        );
    }

    #[test]
    fn test_single_body_lifts_description() {
        let parameters = Parameters {
            body: Some(pet().with_description("New pet").into()),
            ..Default::default()
        };

        assert_eq!(
            convert(&parameters).unwrap(),
            json!([{
                "in": "body",
                "name": "Pet",
                "required": true,
                "description": "New pet",
                "schema": {"$ref": "#/definitions/Pet"}
            }])
        );
    }

    #[test]
    fn test_unnamed_body_is_dropped() {
        let anonymous = Parameters {
            body: Some(ObjectSchema::new().required("id", LeafSchema::Long).into()),
            ..Default::default()
        };
        assert_eq!(convert(&anonymous).unwrap(), json!([]));

        let leaf = Parameters {
            body: Some(LeafSchema::String.into()),
            ..Default::default()
        };
        assert_eq!(convert(&leaf).unwrap(), json!([]));
    }

    #[test]
    fn test_non_body_fields_become_parameters() {
        let parameters = Parameters {
            path: Some(ObjectSchema::new().required("id", LeafSchema::Long).into()),
            query: Some(
                ObjectSchema::new()
                    .field(Field::new(FieldKey::Optional("limit".into()), LeafSchema::Int).with_description("Page size"))
                    .optional("tags", Schema::sequence(LeafSchema::String))
                    .predicate(PredicateKey::AnyKeyword, LeafSchema::Any)
                    .into(),
            ),
            ..Default::default()
        };

        assert_eq!(
            convert(&parameters).unwrap(),
            json!([
                {"in": "query", "name": "limit", "required": false, "type": "integer", "format": "int32", "description": "Page size"},
                {"in": "query", "name": "tags", "required": false, "type": "array", "items": {"type": "string"}},
                {"in": "path", "name": "id", "required": true, "type": "integer", "format": "int64"}
            ])
        );
    }

    #[test]
    fn test_absent_locations_yield_nothing() {
        assert_eq!(convert(&Parameters::default()).unwrap(), json!([]));
    }

    #[test]
    fn test_non_body_must_be_keyed() {
        let parameters = Parameters {
            header: Some(LeafSchema::String.into()),
            ..Default::default()
        };
        assert!(matches!(convert(&parameters), Err(SwaggerError::InvalidParameters(_))));
    }

    #[test]
    fn test_strict_mode_rejects_unmapped_leaves() {
        let form = Parameters {
            form_data: Some(ObjectSchema::new().required("amount", LeafSchema::Custom("Money".into())).into()),
            ..Default::default()
        };
        assert!(matches!(convert(&form), Err(SwaggerError::UnsupportedSchema(_))));

        let body = Parameters {
            body: Some(Schema::sequence(LeafSchema::Custom("Money".into()))),
            ..Default::default()
        };
        // unnamed elements are dropped before encoding
        assert_eq!(convert(&body).unwrap(), json!([]));
    }

    #[test]
    fn test_classify_dispatch() {
        let pets = Schema::set(pet());
        assert!(matches!(ParameterShape::body(&pets), ParameterShape::BodySet(item) if item.name() == Some("Pet")));

        let parameters = Parameters {
            body: Some(pet().into()),
            header: Some(ObjectSchema::new().into()),
            ..Default::default()
        };
        let shapes = ParameterShape::classify(&parameters);
        assert!(matches!(shapes[0], ParameterShape::BodySingle(_)));
        assert!(matches!(shapes[1], ParameterShape::NonBody(ParameterLocation::Header, _)));
    }

    #[test]
    fn test_non_body_composite_values_are_rejected() {
        let filter = ObjectSchema::named("Filter").required("q", LeafSchema::String);
        let named = Parameters {
            query: Some(ObjectSchema::new().required("filter", filter).into()),
            ..Default::default()
        };
        assert!(matches!(convert(&named), Err(SwaggerError::InvalidParameters(_))));

        let nested = Parameters {
            header: Some(
                ObjectSchema::new()
                    .optional("ids", Schema::sequence(ObjectSchema::new().required("id", LeafSchema::Long)))
                    .into(),
            ),
            ..Default::default()
        };
        assert!(matches!(convert(&nested), Err(SwaggerError::InvalidParameters(_))));

        let leaf_encoder = DefaultLeafEncoder::new();
        let relaxed = SchemaEncoder::new(&leaf_encoder, SpecVersion::V2_0, MappingMode::Relaxed);
        let mixed = Parameters {
            query: Some(
                ObjectSchema::new()
                    .required("filter", ObjectSchema::named("Filter"))
                    .optional("limit", LeafSchema::Int)
                    .into(),
            ),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(convert_parameters(&mixed, &relaxed).unwrap()).unwrap(),
            json!([{"in": "query", "name": "limit", "required": false, "type": "integer", "format": "int32"}])
        );
    }
}
