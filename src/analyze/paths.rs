//! Path string normalization shared by the API extractors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::MethodFacts;

/// Matches the `:regex` constraint suffix inside a `{name:regex}` segment.
static REGEX_CONSTRAINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":[^}]*\}").expect("constraint pattern must compile"));

/// Normalize a base path: trimmed, unquoted, a single trailing `*` and a
/// single trailing `/` removed, always starting with `/`.
///
/// The bare root stays `/`. Exactly one trailing character is removed per
/// rule; `/foo/` becomes `/foo`, never `/fo`.
pub fn format_base_path(raw: &str) -> String {
    let mut path = raw.trim().replace('"', "");
    if let Some(stripped) = path.strip_suffix('*') {
        path = stripped.to_string();
    }
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path.len() > 1 {
        if let Some(stripped) = path.strip_suffix('/') {
            path = stripped.to_string();
        }
    }
    path
}

/// Normalize a path fragment for concatenation onto a base: trimmed,
/// unquoted, starting with `/`, not ending with `/`. An empty fragment
/// normalizes to the empty string (nothing to concatenate).
pub fn format_concat_path(raw: &str) -> String {
    let mut path = raw.trim().replace('"', "");
    if path.is_empty() {
        return path;
    }
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if let Some(stripped) = path.strip_suffix('/') {
        path = stripped.to_string();
    }
    path
}

/// Ensure a fragment starts with `/`, leaving empty fragments alone.
pub fn start_with_slash(raw: &str) -> String {
    let path = raw.trim().replace('"', "");
    if path.is_empty() || path.starts_with('/') {
        return path;
    }
    format!("/{}", path)
}

/// Strip regex constraints from path parameter segments:
/// `/{id:[0-9]+}` becomes `/{id}`.
pub fn strip_regex_constraints(path: &str) -> String {
    REGEX_CONSTRAINT.replace_all(path, "}").to_string()
}

/// Rewrite `{name}` segments to `{TYPE}` for every method parameter that
/// carries the given path-parameter marker.
///
/// The parameter's declared name inside the path is taken from the first of
/// `name_keys` present on the marker, falling back to the Java parameter
/// name. Two endpoints differing only in parameter naming then compare
/// equal once their parameter types agree.
pub fn set_type_in_path(
    path: &str,
    method: &MethodFacts,
    marker_name: &str,
    name_keys: &[&str],
) -> String {
    let mut new_path = strip_regex_constraints(path);
    for param in &method.params {
        for marker in &param.markers {
            if !marker.simple_name().eq_ignore_ascii_case(marker_name) {
                continue;
            }
            let declared = name_keys
                .iter()
                .find_map(|key| marker.param_str(key))
                .unwrap_or(&param.name)
                .replace('"', "");
            let needle = format!("{{{}}}", declared);
            if new_path.contains(&needle) {
                let replacement = format!("{{{}}}", param.type_name.to_uppercase());
                new_path = new_path.replace(&needle, &replacement);
            }
        }
    }
    new_path
}

/// Uppercase `{name}` segments purely syntactically, rebuilding the path
/// with a leading slash and no empty segments. Used where no parameter
/// declaration backs the path string. A path without any segments is kept
/// as written.
pub fn uppercase_path_params(path: &str) -> String {
    let mut rebuilt = String::new();
    for part in path.split('/') {
        if part.is_empty() {
            continue;
        }
        rebuilt.push('/');
        if part.starts_with('{') && part.ends_with('}') {
            rebuilt.push_str(&part.to_uppercase());
        } else {
            rebuilt.push_str(part);
        }
    }
    if rebuilt.is_empty() {
        return path.to_string();
    }
    rebuilt
}
