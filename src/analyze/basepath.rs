//! Base-path resolution for the API surface extractor.
//!
//! The application's base URL path can come from several places; the first
//! source that yields a value wins:
//!
//! 1. an explicit context path supplied by the caller,
//! 2. a configured descriptor file, parsed by extension,
//! 3. a `web.xml` found in the tree (`url-pattern` under `servlet-mapping`),
//! 4. a `glassfish-web.xml` (`context-root` under `glassfish-web-app`),
//! 5. an `ApplicationPath` marker in the scanned sources.
//!
//! A descriptor that exists but cannot be parsed, or lacks the expected
//! element, yields nothing from that source and resolution falls through.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::analyze::dialects::DialectTables;
use crate::analyze::paths::format_base_path;
use crate::model::SourceModel;

/// Descriptor search never descends deeper than this, so build output and
/// dependency caches cannot drag the scan into unrelated trees.
const DESCRIPTOR_SEARCH_DEPTH: usize = 6;

/// Properties/YAML key carrying the servlet context path.
const CONTEXT_PATH_KEY: &str = "server.servlet.context-path";

/// Resolve the base path for a source tree.
///
/// Returns the normalized base path (leading `/`, no trailing `/`), or
/// `None` when no source yields one.
pub fn resolve(
    root: &Path,
    model: &SourceModel,
    explicit: Option<&str>,
    descriptor_file: Option<&Path>,
    tables: &DialectTables,
) -> Option<String> {
    if let Some(context_path) = explicit {
        return Some(format_base_path(context_path));
    }

    if let Some(file) = descriptor_file {
        if let Some(path) = read_descriptor(file) {
            return Some(format_base_path(&path));
        }
        log::warn!(
            "configured descriptor {} yielded no base path",
            file.display()
        );
    }

    if let Some(file) = find_descriptor(root, "web.xml") {
        if let Some(path) = read_xml_descriptor(&file) {
            return Some(format_base_path(&path));
        }
    } else {
        log::info!("no web.xml found under {}", root.display());
    }

    if let Some(file) = find_descriptor(root, "glassfish-web.xml") {
        if let Some(path) = read_xml_descriptor(&file) {
            return Some(format_base_path(&path));
        }
    } else {
        log::info!("no glassfish-web.xml found under {}", root.display());
    }

    if let Some(path) = application_path_marker(model, tables) {
        return Some(format_base_path(&path));
    }

    None
}

/// Search the tree for a descriptor file by name, bounded in depth.
/// The first match in sorted walk order wins.
fn find_descriptor(root: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .max_depth(DESCRIPTOR_SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(|e| e.into_path())
}

/// Parse a configured descriptor by its extension.
fn read_descriptor(file: &Path) -> Option<String> {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "xml" => read_xml_descriptor(file),
        "properties" => read_properties_descriptor(file),
        "yml" | "yaml" => read_yaml_descriptor(file),
        _ => {
            log::warn!("unsupported descriptor type: {}", file.display());
            None
        }
    }
}

/// Read the path-bearing element from a container descriptor:
/// `url-pattern` under `servlet-mapping`, or `context-root` under
/// `glassfish-web-app`.
fn read_xml_descriptor(file: &Path) -> Option<String> {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(err) => {
            log::warn!("could not read descriptor {}: {}", file.display(), err);
            return None;
        }
    };
    let doc = match roxmltree::Document::parse(&content) {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("could not parse descriptor {}: {}", file.display(), err);
            return None;
        }
    };

    // Container descriptors usually carry a default namespace, so tags
    // are matched by local name.
    for (tag, parent) in [
        ("url-pattern", "servlet-mapping"),
        ("context-root", "glassfish-web-app"),
    ] {
        let found = doc.descendants().find(|node| {
            node.is_element()
                && node.tag_name().name() == tag
                && node
                    .parent_element()
                    .map(|p| p.tag_name().name() == parent)
                    .unwrap_or(false)
        });
        if let Some(node) = found {
            if let Some(text) = node.text() {
                return Some(text.trim().to_string());
            }
        }
    }

    log::warn!(
        "descriptor {} lacks a url-pattern/context-root element",
        file.display()
    );
    None
}

/// Read the context-path key from a `.properties` file.
fn read_properties_descriptor(file: &Path) -> Option<String> {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(err) => {
            log::warn!("could not read descriptor {}: {}", file.display(), err);
            return None;
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == CONTEXT_PATH_KEY {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Read the context-path key from a YAML file, accepting both the flat
/// `server.servlet.context-path` key and the standard nested form.
fn read_yaml_descriptor(file: &Path) -> Option<String> {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(err) => {
            log::warn!("could not read descriptor {}: {}", file.display(), err);
            return None;
        }
    };
    let value: serde_yaml::Value = match serde_yaml::from_str(&content) {
        Ok(v) => v,
        Err(err) => {
            log::warn!("could not parse descriptor {}: {}", file.display(), err);
            return None;
        }
    };

    if let Some(flat) = value.get(CONTEXT_PATH_KEY).and_then(|v| v.as_str()) {
        return Some(flat.to_string());
    }

    value
        .get("server")
        .and_then(|v| v.get("servlet"))
        .and_then(|v| v.get("context-path"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// First `ApplicationPath` marker value across the scanned classes.
fn application_path_marker(model: &SourceModel, tables: &DialectTables) -> Option<String> {
    model.classes().find_map(|class| {
        class
            .marker(&tables.application_path_marker)
            .and_then(|marker| marker.param_str("value"))
            .map(|s| s.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn empty_model() -> SourceModel {
        SourceModel::scan(Path::new("/nonexistent/archmap-basepath"))
    }

    #[test]
    fn test_explicit_context_path_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("web.xml"),
            "<web-app><servlet-mapping><url-pattern>/ignored/*</url-pattern></servlet-mapping></web-app>",
        )
        .unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            Some("explicit"),
            None,
            &DialectTables::default(),
        );
        assert_eq!(base.as_deref(), Some("/explicit"));
    }

    #[test]
    fn test_web_xml_url_pattern() {
        let temp = TempDir::new().unwrap();
        let webinf = temp.path().join("WEB-INF");
        fs::create_dir_all(&webinf).unwrap();
        fs::write(
            webinf.join("web.xml"),
            r#"<?xml version="1.0"?>
<web-app>
  <servlet-mapping>
    <servlet-name>api</servlet-name>
    <url-pattern>/api/*</url-pattern>
  </servlet-mapping>
</web-app>"#,
        )
        .unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            None,
            &DialectTables::default(),
        );
        assert_eq!(base.as_deref(), Some("/api"));
    }

    #[test]
    fn test_glassfish_context_root() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("glassfish-web.xml"),
            r#"<glassfish-web-app><context-root>/service</context-root></glassfish-web-app>"#,
        )
        .unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            None,
            &DialectTables::default(),
        );
        assert_eq!(base.as_deref(), Some("/service"));
    }

    #[test]
    fn test_properties_descriptor() {
        let temp = TempDir::new().unwrap();
        let props = temp.path().join("application.properties");
        fs::write(
            &props,
            "# comment\nserver.port=8080\nserver.servlet.context-path=/shop\n",
        )
        .unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            Some(&props),
            &DialectTables::default(),
        );
        assert_eq!(base.as_deref(), Some("/shop"));
    }

    #[test]
    fn test_yaml_descriptor_nested() {
        let temp = TempDir::new().unwrap();
        let yml = temp.path().join("application.yml");
        fs::write(&yml, "server:\n  servlet:\n    context-path: /shop\n").unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            Some(&yml),
            &DialectTables::default(),
        );
        assert_eq!(base.as_deref(), Some("/shop"));
    }

    #[test]
    fn test_malformed_descriptor_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("web.xml"), "<not-closed").unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            None,
            &DialectTables::default(),
        );
        assert_eq!(base, None);
    }

    #[test]
    fn test_url_pattern_outside_servlet_mapping_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("web.xml"),
            r#"<web-app><filter-mapping><url-pattern>/nope/*</url-pattern></filter-mapping></web-app>"#,
        )
        .unwrap();

        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            None,
            &DialectTables::default(),
        );
        assert_eq!(base, None);
    }

    #[test]
    fn test_no_sources_means_no_base() {
        let temp = TempDir::new().unwrap();
        let base = resolve(
            temp.path(),
            &empty_model(),
            None,
            None,
            &DialectTables::default(),
        );
        assert_eq!(base, None);
    }
}
