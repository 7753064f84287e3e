//! API consumption extraction.
//!
//! Reads declarative "calls external service" markers from methods and
//! groups them by (service tag, package). Only classes that import the
//! marker type are inspected, which keeps the per-method scan cheap.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::paths::uppercase_path_params;
use crate::analyze::types::{ConsumeDescription, HttpMethod, DEFAULT_SERVICE};
use crate::model::{ClassFacts, Marker, MarkerValue, SourceModel};

/// A service tag is `group:artifact` or `group:artifact:version`.
static SERVICE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9._-]+:){1,2}[A-Za-z0-9._-]+$").expect("tag pattern must compile")
});

/// Configuration for the consumption scan.
#[derive(Debug, Clone)]
pub struct ConsumeConfig {
    /// Fully-qualified name of the consumption marker; classes must import
    /// it to be inspected. The repeatable container marker is derived by
    /// appending `s`.
    pub marker_import: String,
}

impl Default for ConsumeConfig {
    fn default() -> Self {
        Self {
            marker_import: "annotation.ConsumesAPI".to_string(),
        }
    }
}

impl ConsumeConfig {
    fn marker_name(&self) -> &str {
        self.marker_import
            .rsplit('.')
            .next()
            .unwrap_or(&self.marker_import)
    }

    fn container_name(&self) -> String {
        format!("{}s", self.marker_name())
    }
}

/// Extract every declared outbound call from the scanned model.
pub fn extract(model: &SourceModel, config: &ConsumeConfig) -> Vec<ConsumeDescription> {
    let marker_name = config.marker_name();
    let container_name = config.container_name();
    let mut descriptions: Vec<ConsumeDescription> = Vec::new();

    for class in model.classes() {
        if !class.imports_contain(&config.marker_import) {
            continue;
        }
        log::debug!(
            "scanning consumption markers in {}.{}",
            class.package,
            class.name
        );

        for method in &class.methods {
            for marker in &method.markers {
                if marker.simple_name() == marker_name {
                    add_occurrence(class, marker, &mut descriptions);
                } else if marker.simple_name() == container_name {
                    if let Some(MarkerValue::Markers(nested)) = marker.param("value") {
                        for inner in nested {
                            add_occurrence(class, inner, &mut descriptions);
                        }
                    }
                }
            }
        }
    }

    descriptions
}

/// Read one marker occurrence into the description list.
///
/// The `service` parameter is optional and falls back to the sentinel when
/// missing or invalid; `path` and `method` are required and an occurrence
/// with a method outside the enumeration is dropped entirely.
fn add_occurrence(class: &ClassFacts, marker: &Marker, descriptions: &mut Vec<ConsumeDescription>) {
    let service = match marker.param_str("service") {
        Some(raw) => {
            let candidate = raw.trim().replace('"', "");
            if SERVICE_TAG.is_match(&candidate) {
                candidate
            } else {
                log::warn!(
                    "{} is not a valid service tag (line {}); expected group:artifact[:version], using {}",
                    candidate,
                    marker.span.start_line,
                    DEFAULT_SERVICE
                );
                DEFAULT_SERVICE.to_string()
            }
        }
        None => DEFAULT_SERVICE.to_string(),
    };

    let path = match marker.param_str("path") {
        Some(p) => p.trim().replace('"', ""),
        None => {
            log::error!(
                "consumption marker without a path in {}.{} (line {})",
                class.package,
                class.name,
                marker.span.start_line
            );
            return;
        }
    };

    let method_token = match marker.param_str("method") {
        Some(m) => m.trim().replace('"', ""),
        None => {
            log::error!(
                "consumption marker without a method in {}.{} (line {})",
                class.package,
                class.name,
                marker.span.start_line
            );
            return;
        }
    };
    let method = match HttpMethod::from_str(&method_token) {
        Ok(m) => m,
        Err(_) => {
            log::error!(
                "{} is not a valid HTTP method in {}.{} (line {})",
                method_token,
                class.package,
                class.name,
                marker.span.start_line
            );
            return;
        }
    };

    let path = uppercase_path_params(&path);
    log::info!("{}  -  {}  -  {}", service, path, method);

    let existing = descriptions
        .iter_mut()
        .find(|d| d.service_name == service && d.package_name == class.package);
    match existing {
        Some(description) => description.add_path_to_method(path, method.as_str()),
        None => {
            let mut description = ConsumeDescription::new(service, class.package.clone());
            description.add_path_to_method(path, method.as_str());
            descriptions.push(description);
        }
    }
}
