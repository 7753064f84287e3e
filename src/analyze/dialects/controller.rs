//! Mapping-centric endpoint dialect.
//!
//! Classes are eligible when they carry a component-role marker or a
//! class-level mapping marker; the class-level mapping (if any) supplies
//! base paths and possibly base verbs. Method-level mapping markers are
//! combined with the base mappings: an explicit method verb wins, a base
//! verb applies otherwise, and a mapping with no verb at all offers every
//! method in the enumeration.

use crate::analyze::paths::{format_concat_path, set_type_in_path, start_with_slash};
use crate::analyze::types::{HttpMethod, ALL_METHODS};
use crate::model::{ClassFacts, Marker, MethodFacts};

use super::{DialectTables, EndpointDialect, PathMethodFact};

pub struct ControllerDialect;

/// One evaluated mapping: a path and the verb it names, if any.
type Mapping = (String, Option<HttpMethod>);

impl EndpointDialect for ControllerDialect {
    fn dialect_id(&self) -> &'static str {
        "controller"
    }

    fn extract_from_class(
        &self,
        class: &ClassFacts,
        tables: &DialectTables,
    ) -> Vec<PathMethodFact> {
        let mut is_controller = false;
        let mut base_mappings: Option<Vec<Mapping>> = None;

        for marker in &class.markers {
            let name = marker.simple_name();
            if tables.controller_roles.iter().any(|role| role == name) {
                is_controller = true;
            } else if tables.is_mapping_marker(name) {
                // The last class-level mapping marker wins.
                base_mappings = Some(evaluate_mapping(marker, tables));
            }
        }

        if !is_controller && base_mappings.is_none() {
            return Vec::new();
        }

        class
            .methods
            .iter()
            .flat_map(|method| method_facts(method, base_mappings.as_deref(), tables))
            .collect()
    }
}

/// Evaluate one mapping marker into its (path, verb) pairs.
///
/// Paths come from the `value` parameter (scalar, list, or absent meaning
/// one empty path). Verbs come from the marker name for verb-specific
/// markers, or from the generic marker's `method` tokens; tokens outside
/// the table degrade to "no verb", which downstream means every method.
fn evaluate_mapping(marker: &Marker, tables: &DialectTables) -> Vec<Mapping> {
    let paths: Vec<String> = match marker.param("value") {
        Some(value) => {
            let items = value.scalar_items();
            if items.is_empty() {
                vec![String::new()]
            } else {
                items.iter().map(|s| s.trim().to_string()).collect()
            }
        }
        None => vec![String::new()],
    };

    let verbs: Vec<HttpMethod> = if marker.simple_name() == tables.request_mapping_marker {
        marker
            .param("method")
            .map(|value| {
                value
                    .scalar_items()
                    .iter()
                    .filter_map(|token| tables.request_method(token))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        tables
            .mapping_verb(marker.simple_name())
            .into_iter()
            .collect()
    };

    let mut mappings = Vec::new();
    for path in paths {
        if verbs.is_empty() {
            mappings.push((path, None));
        } else {
            for verb in &verbs {
                mappings.push((path.clone(), Some(*verb)));
            }
        }
    }
    mappings
}

/// Combine one method's mapping markers with the class-level base mappings.
fn method_facts(
    method: &MethodFacts,
    base_mappings: Option<&[Mapping]>,
    tables: &DialectTables,
) -> Vec<PathMethodFact> {
    let mut facts = Vec::new();

    for marker in &method.markers {
        if !tables.is_mapping_marker(marker.simple_name()) {
            continue;
        }
        for (method_path, method_verb) in evaluate_mapping(marker, tables) {
            match (method_verb, base_mappings) {
                (Some(verb), Some(bases)) => {
                    for (base_path, _) in bases {
                        facts.push(fact(method, base_path, &method_path, verb, tables));
                    }
                }
                (Some(verb), None) => {
                    facts.push(fact(method, "", &method_path, verb, tables));
                }
                (None, Some(bases)) => {
                    for (base_path, base_verb) in bases {
                        match base_verb {
                            Some(verb) => {
                                facts.push(fact(method, base_path, &method_path, *verb, tables));
                            }
                            None => {
                                // No verb anywhere: every method is allowed.
                                for verb in ALL_METHODS {
                                    facts.push(fact(
                                        method,
                                        base_path,
                                        &method_path,
                                        verb,
                                        tables,
                                    ));
                                }
                            }
                        }
                    }
                }
                (None, None) => {
                    for verb in ALL_METHODS {
                        facts.push(fact(method, "", &method_path, verb, tables));
                    }
                }
            }
        }
    }

    facts
}

fn fact(
    method: &MethodFacts,
    base_path: &str,
    method_path: &str,
    verb: HttpMethod,
    tables: &DialectTables,
) -> PathMethodFact {
    let path = format!(
        "{}{}",
        format_concat_path(base_path),
        start_with_slash(method_path)
    );
    let path = set_type_in_path(&path, method, &tables.path_variable_marker, &["value", "name"]);
    PathMethodFact { path, method: verb }
}
