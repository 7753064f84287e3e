//! Endpoint marker dialects.
//!
//! Two conventions for declaring HTTP endpoints are supported: the
//! resource-path-centric dialect (class-level `Path`, verb markers per
//! method) and the mapping-centric controller dialect (`RequestMapping`
//! and verb-specific mapping markers). Both produce the same
//! [`PathMethodFact`]s; adding a dialect means adding an implementation,
//! not branching logic in the extractor.

mod controller;
mod resource;

pub use controller::ControllerDialect;
pub use resource::ResourceDialect;

use crate::analyze::types::HttpMethod;
use crate::model::ClassFacts;

/// One endpoint fact before base-path resolution: a path relative to the
/// application root and the method offered there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMethodFact {
    pub path: String,
    pub method: HttpMethod,
}

/// Marker-name lookup tables driving dialect interpretation.
///
/// Kept as a value rather than embedded constants so tests can substitute
/// their own tables.
#[derive(Debug, Clone)]
pub struct DialectTables {
    /// Resource-dialect verb markers (`GET` .. `OPTIONS`; the resource
    /// dialect has no PATCH marker).
    pub resource_verbs: Vec<(String, HttpMethod)>,
    /// Resource-dialect sub-path marker.
    pub resource_path_marker: String,
    /// Resource-dialect application base-path marker.
    pub application_path_marker: String,
    /// Resource-dialect path-parameter marker on method parameters.
    pub path_param_marker: String,
    /// Controller-dialect component-role markers that make a class
    /// eligible even without a class-level mapping.
    pub controller_roles: Vec<String>,
    /// Controller-dialect generic mapping marker.
    pub request_mapping_marker: String,
    /// Controller-dialect verb-specific mapping markers.
    pub mapping_verbs: Vec<(String, HttpMethod)>,
    /// Tokens accepted in the generic mapping marker's `method` parameter.
    pub request_method_tokens: Vec<(String, HttpMethod)>,
    /// Controller-dialect path-parameter marker on method parameters.
    pub path_variable_marker: String,
}

impl Default for DialectTables {
    fn default() -> Self {
        Self {
            resource_verbs: vec![
                ("GET".to_string(), HttpMethod::Get),
                ("PUT".to_string(), HttpMethod::Put),
                ("POST".to_string(), HttpMethod::Post),
                ("DELETE".to_string(), HttpMethod::Delete),
                ("HEAD".to_string(), HttpMethod::Head),
                ("OPTIONS".to_string(), HttpMethod::Options),
            ],
            resource_path_marker: "Path".to_string(),
            application_path_marker: "ApplicationPath".to_string(),
            path_param_marker: "PathParam".to_string(),
            controller_roles: vec![
                "Controller".to_string(),
                "RestController".to_string(),
                "Component".to_string(),
                "Service".to_string(),
            ],
            request_mapping_marker: "RequestMapping".to_string(),
            mapping_verbs: vec![
                ("GetMapping".to_string(), HttpMethod::Get),
                ("PutMapping".to_string(), HttpMethod::Put),
                ("PostMapping".to_string(), HttpMethod::Post),
                ("DeleteMapping".to_string(), HttpMethod::Delete),
                ("PatchMapping".to_string(), HttpMethod::Patch),
            ],
            request_method_tokens: vec![
                ("RequestMethod.GET".to_string(), HttpMethod::Get),
                ("RequestMethod.PUT".to_string(), HttpMethod::Put),
                ("RequestMethod.POST".to_string(), HttpMethod::Post),
                ("RequestMethod.DELETE".to_string(), HttpMethod::Delete),
                ("RequestMethod.HEAD".to_string(), HttpMethod::Head),
                ("RequestMethod.OPTIONS".to_string(), HttpMethod::Options),
                ("RequestMethod.PATCH".to_string(), HttpMethod::Patch),
            ],
            path_variable_marker: "PathVariable".to_string(),
        }
    }
}

impl DialectTables {
    pub fn resource_verb(&self, marker_name: &str) -> Option<HttpMethod> {
        self.resource_verbs
            .iter()
            .find(|(name, _)| name == marker_name)
            .map(|(_, method)| *method)
    }

    pub fn mapping_verb(&self, marker_name: &str) -> Option<HttpMethod> {
        self.mapping_verbs
            .iter()
            .find(|(name, _)| name == marker_name)
            .map(|(_, method)| *method)
    }

    pub fn request_method(&self, token: &str) -> Option<HttpMethod> {
        self.request_method_tokens
            .iter()
            .find(|(name, _)| name == token)
            .map(|(_, method)| *method)
    }

    pub fn is_mapping_marker(&self, marker_name: &str) -> bool {
        marker_name == self.request_mapping_marker
            || self.mapping_verbs.iter().any(|(name, _)| name == marker_name)
    }
}

/// One endpoint dialect: a pure function from a scanned class to the
/// endpoint facts it declares.
pub trait EndpointDialect: Send + Sync {
    /// Dialect identifier for logging.
    fn dialect_id(&self) -> &'static str;

    /// Extract all endpoint facts one class declares under this dialect.
    /// A class that does not speak the dialect yields nothing.
    fn extract_from_class(&self, class: &ClassFacts, tables: &DialectTables)
        -> Vec<PathMethodFact>;
}

static RESOURCE: ResourceDialect = ResourceDialect;
static CONTROLLER: ControllerDialect = ControllerDialect;

/// The closed set of supported dialects.
pub fn dialects() -> [&'static dyn EndpointDialect; 2] {
    [&RESOURCE, &CONTROLLER]
}
