/*!
Model extraction across an API surface.

[`extract_models`] names the top-level body and response schemas of every
operation; [`collect_models`] then pulls every named composite out of those
trees, however deep. Both resolve name collisions by letting the schema seen
last win. That is a known limitation, kept on purpose;
[`CollisionPolicy::Error`] is available to callers who want collisions
surfaced instead. Document assembly goes through [`collect_surface_models`],
which applies the policy to every node it records.
*/

use crate::{
    config::CollisionPolicy,
    error::{SwaggerError, SwaggerResult},
    namer::with_named_sub_schemas,
    routes::ApiSurface,
    schema::{ObjectSchema, Schema},
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Models keyed by name
pub type ModelMap = BTreeMap<String, ObjectSchema>;

/// Named top-level models of every operation, ordered by name.
///
/// Bodies and response schemas are looked through one container level, so
/// `[Pet]` contributes `Pet`. Leaves contribute nothing.
pub fn extract_models(surface: &ApiSurface) -> Vec<ObjectSchema> {
    let mut models = ModelMap::new();
    for (name, model) in named_roots(surface) {
        models.insert(name, model);
    }
    models.into_values().collect()
}

/// Top-level models with their sub-schemas named, in route order
fn named_roots(surface: &ApiSurface) -> Vec<(String, ObjectSchema)> {
    let mut roots = Vec::new();

    for (path, method, operation) in surface.operations() {
        for root in operation.model_roots() {
            if !matches!(root.peek(), Schema::Object(_)) {
                continue;
            }
            let Schema::Object(model) = with_named_sub_schemas(root.peek()) else {
                continue;
            };
            if let Some(name) = model.name().map(str::to_string) {
                trace!("Extracted model {} from {} {}", name, method, path);
                roots.push((name, model));
            }
        }
    }

    roots
}

/// Every named composite anywhere inside `schema`, keyed by name.
///
/// Parents are recorded before their children; a later node with the same
/// name replaces an earlier one.
pub fn collect_models(schema: &Schema) -> ModelMap {
    let mut models = ModelMap::new();
    // overwriting never fails
    let _ = visit(schema, &mut models, CollisionPolicy::Overwrite);
    models
}

/// Like [`collect_models`], applying `policy` to every node with a name
/// already recorded
pub fn collect_models_with(schema: &Schema, policy: CollisionPolicy) -> SwaggerResult<ModelMap> {
    let mut models = ModelMap::new();
    visit(schema, &mut models, policy)?;
    Ok(models)
}

fn visit(schema: &Schema, models: &mut ModelMap, policy: CollisionPolicy) -> SwaggerResult<()> {
    match schema {
        Schema::Object(object) => {
            if let Some(name) = object.name() {
                insert_model(models, name.to_string(), object.clone(), policy)?;
            }
            for field in &object.fields {
                visit(&field.schema, models, policy)?;
            }
            Ok(())
        }
        Schema::Container(container) => visit(&container.item, models, policy),
        Schema::Leaf(_) => Ok(()),
    }
}

fn insert_model(models: &mut ModelMap, name: String, model: ObjectSchema, policy: CollisionPolicy) -> SwaggerResult<()> {
    if let Some(existing) = models.get(&name) {
        if existing != &model {
            match policy {
                CollisionPolicy::Overwrite => {
                    debug!("Model name collision on {}, keeping the last seen schema", name);
                }
                CollisionPolicy::Error => {
                    return Err(SwaggerError::duplicate_model(format!(
                        "two different schemas are named {}",
                        name
                    )));
                }
            }
        }
    }
    models.insert(name, model);
    Ok(())
}

/// Merge `source` into `target` under the given collision policy
pub fn merge_models(target: &mut ModelMap, source: ModelMap, policy: CollisionPolicy) -> SwaggerResult<()> {
    for (name, model) in source {
        insert_model(target, name, model, policy)?;
    }
    Ok(())
}

/// Every model of the surface: top-level models plus all their named
/// sub-schemas.
///
/// Roots are visited in route order into one map, so the policy sees every
/// pair of same-named nodes, whether they sit in one tree or in two.
pub fn collect_surface_models(surface: &ApiSurface, policy: CollisionPolicy) -> SwaggerResult<ModelMap> {
    let mut models = ModelMap::new();
    for (_, model) in named_roots(surface) {
        visit(&Schema::Object(model), &mut models, policy)?;
    }
    debug!("Collected {} models", models.len());
    Ok(models)
}
