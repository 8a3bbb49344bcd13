use crate::{
    routes::{ApiSurface, HttpMethod, Operation, Response},
    schema::{LeafSchema, ObjectSchema, Schema},
    specification::SwaggerDocument,
    validation::validate_document,
};

/// Pet model with an anonymous `category` composite
pub fn pet() -> ObjectSchema {
    ObjectSchema::named("Pet")
        .with_description("A pet in the store")
        .required("id", LeafSchema::Long)
        .required("name", LeafSchema::String)
        .required(
            "category",
            ObjectSchema::new()
                .required("id", LeafSchema::Long)
                .required("name", LeafSchema::String),
        )
        .optional("tags", Schema::set(LeafSchema::String))
        .optional(
            "status",
            LeafSchema::Enum(vec!["available".into(), "pending".into(), "sold".into()]),
        )
}

pub fn error_model() -> ObjectSchema {
    ObjectSchema::named("Error")
        .required("code", LeafSchema::Int)
        .required("message", LeafSchema::String)
}

/// Owner model with an anonymous `address` composite
pub fn owner() -> ObjectSchema {
    ObjectSchema::named("Owner")
        .required("name", LeafSchema::String)
        .optional(
            "address",
            ObjectSchema::new()
                .required("street", LeafSchema::String)
                .required("city", LeafSchema::String),
        )
}

/// Small pet store surface touching every parameter location but form data
pub fn petstore() -> ApiSurface {
    ApiSurface::new()
        .route(
            "/pets",
            HttpMethod::Get,
            Operation::new()
                .with_summary("List pets")
                .with_tag("pets")
                .with_query(
                    ObjectSchema::new()
                        .optional("limit", LeafSchema::Int)
                        .optional("tags", Schema::sequence(LeafSchema::String)),
                )
                .with_response(200, Response::new(Schema::sequence(pet())).with_description("All pets")),
        )
        .route(
            "/pets",
            HttpMethod::Post,
            Operation::new()
                .with_summary("Add a pet")
                .with_tag("pets")
                .with_body(pet())
                .with_response(201, Response::new(pet()).with_description("Created"))
                .with_response("default", Response::new(error_model()).with_description("Unexpected error")),
        )
        .route(
            "/pets/:id",
            HttpMethod::Get,
            Operation::new()
                .with_operation_id("getPetById")
                .with_path_params(ObjectSchema::new().required("id", LeafSchema::Long))
                .with_header(ObjectSchema::new().optional("X-Request-Id", LeafSchema::Uuid))
                .with_response(200, Response::new(pet()).with_description("The pet"))
                .with_response(404, Response::new(error_model()).with_description("Not found")),
        )
        .route(
            "/pets/:id/owner/:ownerId",
            HttpMethod::Put,
            Operation::new()
                .with_path_params(
                    ObjectSchema::new()
                        .required("id", LeafSchema::Long)
                        .required("ownerId", LeafSchema::Long),
                )
                .with_body(owner())
                .with_response(204, Response::empty().with_description("Owner replaced")),
        )
}

/// Assert that a document passes structural validation
pub fn assert_valid_document(document: &SwaggerDocument) {
    let report = validate_document(document).unwrap();
    assert!(report.is_ok(), "document has violations: {:?}", report);
}
