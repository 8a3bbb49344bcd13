/*!
# elif-swagger

Swagger 2.0 document generation from composable schema descriptions for the
elif.rs framework.

Request and response shapes are described as [`Schema`] trees: keyed
composites, `sequence`/`set` containers and leaves. The generator names
every anonymous composite from the field path leading to it, collects all
named models into the `definitions` dictionary, and converts parameters and
responses into their wire form with `$ref` links to those definitions.

## Features

- Deterministic path-derived names for nested anonymous models
- Set semantics preserved as `uniqueItems` arrays
- Pluggable leaf encoding with custom type mappings
- Strict or relaxed handling of unmapped leaf schemas
- Structural validation of the assembled document
- JSON and YAML export

## Usage

```rust,no_run
use elif_swagger::{ApiSurface, HttpMethod, LeafSchema, ObjectSchema, Operation, Response};
use elif_swagger::{SwaggerConfig, SwaggerGenerator};

let pet = ObjectSchema::named("Pet")
    .required("id", LeafSchema::Long)
    .required("name", LeafSchema::String);

let surface = ApiSurface::new().route(
    "/pets/:id",
    HttpMethod::Get,
    Operation::new()
        .with_path_params(ObjectSchema::new().required("id", LeafSchema::Long))
        .with_response(200, Response::new(pet)),
);

let generator = SwaggerGenerator::new(SwaggerConfig::new("Petstore", "1.0.0")).unwrap();
let document = generator.assemble(&surface).unwrap();
println!("{}", document.to_json(true).unwrap());
```
*/

// Re-export main types
pub use crate::{
    config::{CollisionPolicy, SwaggerConfig},
    encoder::{DefaultLeafEncoder, LeafEncoder, MappingMode, SchemaEncoder, SpecVersion},
    error::{SwaggerError, SwaggerResult},
    generator::{assemble, normalize_routes, SwaggerGenerator},
    routes::{ApiSurface, HttpMethod, Operation, Parameters, Response},
    schema::{ContainerKind, Field, FieldKey, LeafSchema, ModelName, ObjectSchema, PredicateKey, Schema},
    specification::{SchemaObject, SwaggerDocument},
    validation::{validate_document, validate_value, Violation},
};

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Schema model and encoding
pub mod encoder;
pub mod routes;
pub mod schema;

// Naming and model extraction
pub mod collector;
pub mod namer;
pub mod renderer;

// Operation conversion
pub mod parameters;
pub mod responses;

// Document checks
pub mod validation;

// Utilities
pub mod utils;

// Test utilities
#[cfg(test)]
mod test_utils;
