/*!
The API surface consumed by the generator: a route table mapping URL
templates to per-method operations.
*/

use crate::{schema::Schema, specification::ParameterLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP methods that Swagger 2.0 can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

/// Operations registered per method on one URL template
pub type MethodTable = BTreeMap<HttpMethod, Operation>;

/// Every route of an API
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiSurface {
    pub routes: BTreeMap<String, MethodTable>,
}

/// One operation of a route
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub parameters: Parameters,
    /// Responses keyed by status code (or `default`)
    pub responses: BTreeMap<String, Response>,
}

/// Parameter schemas grouped by location
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters {
    pub body: Option<Schema>,
    pub query: Option<Schema>,
    pub path: Option<Schema>,
    pub header: Option<Schema>,
    pub form_data: Option<Schema>,
}

/// Response declared for one status code
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
    pub headers: BTreeMap<String, Schema>,
    pub examples: BTreeMap<String, Value>,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl ApiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation, replacing any previous one on the same route and method
    pub fn route(mut self, path: impl Into<String>, method: HttpMethod, operation: Operation) -> Self {
        self.routes
            .entry(path.into())
            .or_default()
            .insert(method, operation);
        self
    }

    /// All operations in path then method order
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.routes.iter().flat_map(|(path, methods)| {
            methods
                .iter()
                .map(move |(method, operation)| (path.as_str(), *method, operation))
        })
    }
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn with_body(mut self, schema: impl Into<Schema>) -> Self {
        self.parameters.body = Some(schema.into());
        self
    }

    pub fn with_query(mut self, schema: impl Into<Schema>) -> Self {
        self.parameters.query = Some(schema.into());
        self
    }

    pub fn with_path_params(mut self, schema: impl Into<Schema>) -> Self {
        self.parameters.path = Some(schema.into());
        self
    }

    pub fn with_header(mut self, schema: impl Into<Schema>) -> Self {
        self.parameters.header = Some(schema.into());
        self
    }

    pub fn with_form_data(mut self, schema: impl Into<Schema>) -> Self {
        self.parameters.form_data = Some(schema.into());
        self
    }

    pub fn with_response(mut self, status: impl ToString, response: Response) -> Self {
        self.responses.insert(status.to_string(), response);
        self
    }

    /// Schemas that end up as models: the body and every response schema
    pub fn model_roots(&self) -> impl Iterator<Item = &Schema> {
        self.parameters
            .body
            .iter()
            .chain(self.responses.values().filter_map(|r| r.schema.as_ref()))
    }
}

impl Parameters {
    /// Non-body groups in emission order
    pub fn non_body(&self) -> impl Iterator<Item = (ParameterLocation, &Schema)> {
        [
            (ParameterLocation::Query, &self.query),
            (ParameterLocation::Path, &self.path),
            (ParameterLocation::Header, &self.header),
            (ParameterLocation::FormData, &self.form_data),
        ]
        .into_iter()
        .filter_map(|(location, schema)| schema.as_ref().map(|s| (location, s)))
    }
}

impl Response {
    /// Response with a body schema
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }

    /// Response without a body
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.headers.insert(name.into(), schema.into());
        self
    }

    pub fn with_example(mut self, media_type: impl Into<String>, example: Value) -> Self {
        self.examples.insert(media_type.into(), example);
        self
    }
}
