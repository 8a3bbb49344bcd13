/*!
Structural checks of Swagger 2.0 documents.

Validation never changes its input. It reports every problem it finds as a
[`Violation`] carrying a JSON-pointer-style location.
*/

use crate::{
    config::SWAGGER_VERSION,
    error::SwaggerResult,
    specification::SwaggerDocument,
    utils::PathTemplates,
};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

const METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];
const LOCATIONS: &[&str] = &["body", "query", "path", "header", "formData"];
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A single structural problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending node
    pub location: String,
    pub message: String,
}

impl Violation {
    pub fn new(location: &str, message: &str) -> Self {
        Self {
            location: location.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.location.is_empty() { "/" } else { &self.location };
        write!(f, "{}: {}", location, self.message)
    }
}

/// `Ok(())` when valid, otherwise every violation found
pub type ValidationReport = Result<(), Vec<Violation>>;

/// Check an assembled document
pub fn validate_document(document: &SwaggerDocument) -> SwaggerResult<ValidationReport> {
    Ok(validate_value(&document.to_value()?))
}

/// Check a raw JSON document
pub fn validate_value(document: &Value) -> ValidationReport {
    let mut validator = Validator::default();
    validator.check_document(document);

    if validator.violations.is_empty() {
        Ok(())
    } else {
        debug!("Document has {} violations", validator.violations.len());
        Err(validator.violations)
    }
}

/// Append an escaped segment to a JSON pointer
fn pointer(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment.replace('~', "~0").replace('/', "~1"))
}

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn violation(&mut self, location: &str, message: impl AsRef<str>) {
        self.violations.push(Violation::new(location, message.as_ref()));
    }

    fn check_document(&mut self, document: &Value) {
        let Some(root) = document.as_object() else {
            self.violation("", "document must be an object");
            return;
        };

        match root.get("swagger").and_then(Value::as_str) {
            Some(SWAGGER_VERSION) => {}
            Some(other) => self.violation("/swagger", format!("unsupported version '{}'", other)),
            None => self.violation("/swagger", "required string is missing"),
        }

        self.check_info(root.get("info"));

        let definitions = self.check_definitions(root.get("definitions"));

        match root.get("paths") {
            Some(Value::Object(paths)) => self.check_paths(paths),
            Some(_) => self.violation("/paths", "must be an object"),
            None => self.violation("/paths", "required object is missing"),
        }

        self.check_references(document, "", &definitions);
    }

    fn check_info(&mut self, info: Option<&Value>) {
        let Some(info) = info.and_then(Value::as_object) else {
            self.violation("/info", "required object is missing");
            return;
        };
        for key in ["title", "version"] {
            if !info.get(key).is_some_and(Value::is_string) {
                self.violation(&pointer("/info", key), "required string is missing");
            }
        }
    }

    fn check_definitions(&mut self, definitions: Option<&Value>) -> BTreeSet<String> {
        let Some(definitions) = definitions else {
            return BTreeSet::new();
        };
        let Some(definitions) = definitions.as_object() else {
            self.violation("/definitions", "must be an object");
            return BTreeSet::new();
        };

        for (name, model) in definitions {
            if !model.is_object() {
                self.violation(&pointer("/definitions", name), "definition must be an object");
            }
        }
        definitions.keys().cloned().collect()
    }

    fn check_paths(&mut self, paths: &Map<String, Value>) {
        let templates = PathTemplates::new().ok();

        for (path, item) in paths {
            let location = pointer("/paths", path);
            if !path.starts_with('/') {
                self.violation(&location, "path must start with '/'");
            }
            let Some(item) = item.as_object() else {
                self.violation(&location, "path item must be an object");
                continue;
            };

            let shared = item.get("parameters").and_then(Value::as_array);
            if let Some(shared) = shared {
                self.check_parameters(&pointer(&location, "parameters"), shared);
            }

            let templated = templates
                .as_ref()
                .map(|templates| templates.template_params(path))
                .unwrap_or_default();

            for (key, operation) in item {
                if key == "parameters" || key.starts_with("x-") {
                    continue;
                }
                let operation_location = pointer(&location, key);
                if !METHODS.contains(&key.as_str()) {
                    self.violation(&operation_location, format!("unknown method '{}'", key));
                    continue;
                }
                let Some(operation) = operation.as_object() else {
                    self.violation(&operation_location, "operation must be an object");
                    continue;
                };
                self.check_operation(&operation_location, operation, shared, &templated);
            }
        }
    }

    fn check_operation(
        &mut self,
        location: &str,
        operation: &Map<String, Value>,
        shared: Option<&Vec<Value>>,
        templated: &[String],
    ) {
        match operation.get("responses") {
            Some(Value::Object(responses)) if !responses.is_empty() => {
                self.check_responses(&pointer(location, "responses"), responses)
            }
            Some(Value::Object(_)) | None => self.violation(location, "operation must declare at least one response"),
            Some(_) => self.violation(&pointer(location, "responses"), "must be an object"),
        }

        let own: &[Value] = match operation.get("parameters") {
            Some(Value::Array(parameters)) => {
                self.check_parameters(&pointer(location, "parameters"), parameters);
                parameters.as_slice()
            }
            Some(_) => {
                self.violation(&pointer(location, "parameters"), "must be an array");
                &[]
            }
            None => &[],
        };

        let declared: BTreeSet<&str> = own
            .iter()
            .chain(shared.into_iter().flatten())
            .filter(|parameter| parameter.get("in").and_then(Value::as_str) == Some("path"))
            .filter_map(|parameter| parameter.get("name").and_then(Value::as_str))
            .collect();

        for name in templated {
            if !declared.contains(name.as_str()) {
                self.violation(location, format!("path segment '{{{}}}' has no path parameter", name));
            }
        }
    }

    fn check_responses(&mut self, location: &str, responses: &Map<String, Value>) {
        for (status, response) in responses {
            if status.starts_with("x-") {
                continue;
            }
            let response_location = pointer(location, status);
            match response.as_object() {
                Some(response) if response.contains_key("$ref") => {}
                Some(response) => {
                    if !response.get("description").is_some_and(Value::is_string) {
                        self.violation(&pointer(&response_location, "description"), "required string is missing");
                    }
                }
                None => self.violation(&response_location, "response must be an object"),
            }
        }
    }

    fn check_parameters(&mut self, location: &str, parameters: &[Value]) {
        for (index, parameter) in parameters.iter().enumerate() {
            let parameter_location = pointer(location, &index.to_string());
            let Some(parameter) = parameter.as_object() else {
                self.violation(&parameter_location, "parameter must be an object");
                continue;
            };
            if parameter.contains_key("$ref") {
                continue;
            }

            if !parameter.get("name").is_some_and(Value::is_string) {
                self.violation(&pointer(&parameter_location, "name"), "required string is missing");
            }

            match parameter.get("in").and_then(Value::as_str) {
                Some("body") => {
                    if !parameter.get("schema").is_some_and(Value::is_object) {
                        self.violation(&parameter_location, "body parameter must carry a schema");
                    }
                }
                Some(kind) if LOCATIONS.contains(&kind) => {
                    if !parameter.contains_key("type") {
                        self.violation(&parameter_location, "non-body parameter must carry a type");
                    }
                    if kind == "path" && parameter.get("required") != Some(&Value::Bool(true)) {
                        self.violation(&pointer(&parameter_location, "required"), "path parameters must be required");
                    }
                }
                Some(other) => {
                    self.violation(&pointer(&parameter_location, "in"), format!("unknown location '{}'", other))
                }
                None => self.violation(&pointer(&parameter_location, "in"), "required string is missing"),
            }
        }
    }

    fn check_references(&mut self, node: &Value, location: &str, definitions: &BTreeSet<String>) {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    if let Some(name) = reference.strip_prefix(DEFINITIONS_PREFIX) {
                        let name = name.replace("~1", "/").replace("~0", "~");
                        if !definitions.contains(&name) {
                            self.violation(
                                &pointer(location, "$ref"),
                                format!("reference '{}' does not resolve", reference),
                            );
                        }
                    }
                }
                for (key, child) in map {
                    // examples are free-form
                    if key == "examples" || key == "example" {
                        continue;
                    }
                    self.check_references(child, &pointer(location, key), definitions);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.check_references(child, &pointer(location, &index.to_string()), definitions);
                }
            }
            _ => {}
        }
    }
}
