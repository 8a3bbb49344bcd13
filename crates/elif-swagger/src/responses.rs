use crate::{
    encoder::SchemaEncoder,
    error::SwaggerResult,
    renderer::render_model,
    routes::Response,
    schema::Schema,
    specification::{ResponseObject, SchemaObject},
};
use std::collections::BTreeMap;
use tracing::debug;

/// Convert per-status responses into their wire form.
///
/// Responses are documentation only, so encoding here is always relaxed:
/// unmapped leaves are left out instead of failing the conversion. Anonymous
/// composites are rendered inline.
pub fn convert_responses(
    responses: &BTreeMap<String, Response>,
    encoder: &SchemaEncoder<'_>,
) -> SwaggerResult<BTreeMap<String, ResponseObject>> {
    let relaxed = encoder.relaxed();
    let mut converted = BTreeMap::new();

    for (status, response) in responses {
        let schema = match &response.schema {
            Some(schema) => response_schema(status, schema, &relaxed)?,
            None => None,
        };

        let mut headers = BTreeMap::new();
        for (name, header) in &response.headers {
            if let Some(fragment) = relaxed.encode(header)? {
                headers.insert(name.clone(), fragment);
            }
        }

        converted.insert(
            status.clone(),
            ResponseObject {
                description: response.description.clone().unwrap_or_default(),
                schema,
                headers,
                examples: response.examples.clone(),
            },
        );
    }

    Ok(converted)
}

fn response_schema(
    status: &str,
    schema: &Schema,
    encoder: &SchemaEncoder<'_>,
) -> SwaggerResult<Option<SchemaObject>> {
    if let Some(fragment) = encoder.encode(schema)? {
        return Ok(Some(fragment));
    }
    match schema {
        Schema::Object(object) => Ok(Some(render_model(object, encoder)?)),
        _ => {
            debug!("Omitting unmapped schema of {} response", status);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{DefaultLeafEncoder, MappingMode, SpecVersion};
    use crate::schema::{LeafSchema, ObjectSchema};
    use serde_json::{json, Value};

    fn convert(responses: &BTreeMap<String, Response>) -> Value {
        let leaf_encoder = DefaultLeafEncoder::new();
        let encoder = SchemaEncoder::new(&leaf_encoder, SpecVersion::V2_0, MappingMode::Strict);
        serde_json::to_value(convert_responses(responses, &encoder).unwrap()).unwrap()
    }

    #[test]
    fn test_named_and_leaf_responses() {
        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response::new(Schema::sequence(ObjectSchema::named("Pet"))).with_description("All pets"),
        );
        responses.insert("201".to_string(), Response::new(LeafSchema::Uuid));
        responses.insert("204".to_string(), Response::empty());

        assert_eq!(
            convert(&responses),
            json!({
                "200": {"description": "All pets", "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}}},
                "201": {"description": "", "schema": {"type": "string", "format": "uuid"}},
                "204": {"description": ""}
            })
        );
    }

    #[test]
    fn test_anonymous_composite_rendered_inline() {
        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response::new(
                ObjectSchema::new()
                    .required("count", LeafSchema::Long)
                    .optional("next", LeafSchema::String),
            ),
        );

        assert_eq!(
            convert(&responses)["200"]["schema"],
            json!({
                "type": "object",
                "properties": {"count": {"type": "integer", "format": "int64"}, "next": {"type": "string"}},
                "required": ["count"]
            })
        );
    }

    #[test]
    fn test_unmapped_leaves_are_tolerated() {
        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response::new(
                ObjectSchema::new()
                    .required("total", LeafSchema::Custom("Money".into()))
                    .required("id", LeafSchema::Long),
            )
            .with_header("X-Rate", LeafSchema::Custom("Rate".into()))
            .with_header("X-Request-Id", LeafSchema::Uuid),
        );
        responses.insert("500".to_string(), Response::new(LeafSchema::Custom("Oops".into())));

        let converted = convert(&responses);
        assert_eq!(converted["200"]["schema"]["required"], json!(["id"]));
        assert_eq!(converted["200"]["headers"], json!({"X-Request-Id": {"type": "string", "format": "uuid"}}));
        assert_eq!(converted["500"], json!({"description": ""}));
    }

    #[test]
    fn test_examples_pass_through() {
        let mut responses = BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response::new(LeafSchema::String).with_example("application/json", json!("pong")),
        );
        assert_eq!(convert(&responses)["200"]["examples"], json!({"application/json": "pong"}));
    }
}
