//! Resource-path-centric endpoint dialect.
//!
//! A class declares a relative sub-path with a class-level `Path` marker;
//! each method contributes a verb marker and optionally a `Path` addendum.
//! A method with only an addendum and no verb is a sub-resource locator,
//! which this engine does not resolve (doing so would require evaluating
//! the method's return type).

use crate::analyze::paths::{format_concat_path, set_type_in_path};
use crate::analyze::types::HttpMethod;
use crate::model::{ClassFacts, MethodFacts};

use super::{DialectTables, EndpointDialect, PathMethodFact};

pub struct ResourceDialect;

impl EndpointDialect for ResourceDialect {
    fn dialect_id(&self) -> &'static str {
        "resource"
    }

    fn extract_from_class(
        &self,
        class: &ClassFacts,
        tables: &DialectTables,
    ) -> Vec<PathMethodFact> {
        let class_path = match class.marker(&tables.resource_path_marker) {
            Some(marker) => marker.param_str("value").unwrap_or("").to_string(),
            None => return Vec::new(),
        };

        class
            .methods
            .iter()
            .filter_map(|method| method_fact(method, &class_path, tables))
            .collect()
    }
}

/// Evaluate one method's markers against the class path.
///
/// Returns the path/method pair when a verb marker is present; a method
/// with only a path addendum yields nothing.
fn method_fact(
    method: &MethodFacts,
    class_path: &str,
    tables: &DialectTables,
) -> Option<PathMethodFact> {
    let mut path = format_concat_path(class_path);
    let mut verb: Option<HttpMethod> = None;

    for marker in &method.markers {
        let name = marker.simple_name();
        if let Some(method_verb) = tables.resource_verb(name) {
            verb = Some(method_verb);
        } else if name == tables.resource_path_marker {
            let addendum = marker.param_str("value").unwrap_or("");
            path.push_str(&format_concat_path(addendum));
            path = set_type_in_path(&path, method, &tables.path_param_marker, &["value"]);
        }
    }

    verb.map(|method| PathMethodFact { path, method })
}
