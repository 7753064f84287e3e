//! Core result types shared by the analyzers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Sentinel service tag used when a consumption marker names no target
/// service, or names an invalid one.
pub const DEFAULT_SERVICE: &str = "--";

/// The closed set of HTTP methods the analyzers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Head,
    Options,
    Patch,
}

/// All methods, in declaration order. Used where a mapping without an
/// explicit verb means "every method is allowed".
pub const ALL_METHODS: [HttpMethod; 7] = [
    HttpMethod::Get,
    HttpMethod::Put,
    HttpMethod::Post,
    HttpMethod::Delete,
    HttpMethod::Head,
    HttpMethod::Options,
    HttpMethod::Patch,
];

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(format!("unknown HTTP method: {}", s)),
        }
    }
}

/// Component dependency graph: component name to the set of component
/// names it imports from. Ordered maps keep serialized output stable.
pub type ComponentGraph = BTreeMap<String, BTreeSet<String>>;

/// Endpoints one package offers: absolute path to the methods exposed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDescription {
    pub package_name: String,
    pub path_to_method_mappings: BTreeMap<String, BTreeSet<HttpMethod>>,
}

impl OfferDescription {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            path_to_method_mappings: BTreeMap::new(),
        }
    }

    /// Record one path/method pair. Union semantics: repeated insertion is
    /// idempotent.
    pub fn add_path_to_method(&mut self, path: impl Into<String>, method: HttpMethod) {
        self.path_to_method_mappings
            .entry(path.into())
            .or_default()
            .insert(method);
    }

    /// Merge another description for the same package into this one.
    pub fn merge(&mut self, other: &OfferDescription) {
        for (path, methods) in &other.path_to_method_mappings {
            self.path_to_method_mappings
                .entry(path.clone())
                .or_default()
                .extend(methods.iter().copied());
        }
    }
}

/// Declared outbound calls from one package to one target service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeDescription {
    pub service_name: String,
    pub package_name: String,
    pub path_to_methods: BTreeMap<String, BTreeSet<String>>,
}

impl ConsumeDescription {
    pub fn new(service_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            package_name: package_name.into(),
            path_to_methods: BTreeMap::new(),
        }
    }

    /// Record one path/method pair, unioning with any existing methods.
    pub fn add_path_to_method(&mut self, path: impl Into<String>, method: impl Into<String>) {
        self.path_to_methods
            .entry(path.into())
            .or_default()
            .insert(method.into());
    }
}
