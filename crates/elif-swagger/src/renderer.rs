use crate::{
    encoder::SchemaEncoder,
    error::SwaggerResult,
    schema::ObjectSchema,
    specification::SchemaObject,
};
use std::collections::BTreeMap;

/// Render a keyed composite into its definitions form.
///
/// Properties come from non-predicate fields; nested composites appear as
/// references. `required` lists non-optional keys in declaration order and is
/// left out when empty. The first encodable predicate field becomes
/// `additionalProperties`. Fields the encoder drops in relaxed mode are left
/// out of both `properties` and `required`.
pub fn render_model(model: &ObjectSchema, encoder: &SchemaEncoder<'_>) -> SwaggerResult<SchemaObject> {
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();

    for field in model.property_fields() {
        let Some(name) = field.key.name() else {
            continue;
        };
        let Some(fragment) = encoder.encode_field(field)? else {
            continue;
        };
        if !field.key.is_optional() {
            required.push(name.to_string());
        }
        properties.insert(name.to_string(), fragment);
    }

    let mut additional_properties = None;
    for field in model.predicate_fields() {
        if let Some(fragment) = encoder.relaxed().encode(&field.schema)? {
            additional_properties = Some(Box::new(fragment));
            break;
        }
    }

    Ok(SchemaObject {
        description: model.description.clone(),
        properties,
        required,
        additional_properties,
        ..SchemaObject::typed("object")
    })
}
