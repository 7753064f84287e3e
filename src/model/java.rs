//! Java source reader using tree-sitter.
//!
//! Projects one source file into [`FileFacts`]: package, imports, and the
//! classes with their markers, methods, and parameters. Only declarative
//! surface is read; bodies and expressions are never evaluated.

use std::collections::BTreeMap;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use super::facts::{ClassFacts, FileFacts, Marker, MarkerValue, MethodFacts, ParamFacts, Span};

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_declaration
  [(scoped_identifier) (identifier)] @package_name
)
"#;

/// Tree-sitter query for class and interface declarations.
const CLASS_QUERY: &str = r#"
(class_declaration
  name: (identifier) @class_name
) @class

(interface_declaration
  name: (identifier) @interface_name
) @interface
"#;

/// Reader for Java sources.
pub struct JavaReader {
    language: Language,
}

impl JavaReader {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse one source file into facts.
    ///
    /// Returns an error only when the parser produces no tree at all;
    /// partial parse errors still yield facts with `has_parse_errors` set.
    pub fn read_file(&self, path: &Path, source: &[u8]) -> anyhow::Result<FileFacts> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Java source: {}", path.display()))?;
        let root = tree.root_node();

        let package = self.extract_package(root, source).unwrap_or_default();
        let imports = extract_imports(root, source);
        let classes = self.extract_classes(root, source, &package, &imports)?;

        Ok(FileFacts {
            path: path.to_string_lossy().replace('\\', "/"),
            package,
            imports,
            classes,
            has_parse_errors: root.has_error(),
        })
    }

    fn extract_package(&self, root: Node, source: &[u8]) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, source);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(node_text(capture.node, source).to_string());
                }
            }
        }
        None
    }

    fn extract_classes(
        &self,
        root: Node,
        source: &[u8],
        package: &str,
        imports: &[String],
    ) -> anyhow::Result<Vec<ClassFacts>> {
        let query = Query::new(&self.language, CLASS_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, source);

        let mut classes = Vec::new();
        let mut seen_positions = std::collections::HashSet::new();

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut decl_node = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "class_name" | "interface_name" => {
                        name = node_text(capture.node, source).to_string();
                    }
                    "class" | "interface" => {
                        decl_node = Some(capture.node);
                    }
                    _ => {}
                }
            }

            let node = match decl_node {
                Some(n) if !name.is_empty() => n,
                _ => continue,
            };
            if !seen_positions.insert((node.start_byte(), name.clone())) {
                continue;
            }

            classes.push(ClassFacts {
                name,
                package: package.to_string(),
                imports: imports.to_vec(),
                markers: extract_markers(node, source),
                methods: extract_methods(node, source),
                span: Span::from_node(node),
            });
        }

        classes.sort_by_key(|c| (c.span.start_byte, c.name.clone()));
        Ok(classes)
    }
}

impl Default for JavaReader {
    fn default() -> Self {
        Self::new()
    }
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Extract import targets in declaration order.
///
/// Wildcard imports keep their `.*` suffix so the import list reflects the
/// source faithfully.
fn extract_imports(root: Node, source: &[u8]) -> Vec<String> {
    let mut imports = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let mut walker = root.walk();
    for child in root.children(&mut walker) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut path = String::new();
        let mut wildcard = false;
        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "scoped_identifier" | "identifier" => {
                    path = node_text(part, source).to_string();
                }
                "asterisk" => wildcard = true,
                _ => {}
            }
        }
        if path.is_empty() {
            continue;
        }
        if wildcard {
            path.push_str(".*");
        }
        if seen.insert(path.clone()) {
            imports.push(path);
        }
    }

    imports
}

/// Extract annotations from a declaration's `modifiers` child.
fn extract_markers(decl: Node, source: &[u8]) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut walker = decl.walk();
    for child in decl.children(&mut walker) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for modifier in child.children(&mut inner) {
            if let Some(marker) = parse_annotation(modifier, source) {
                markers.push(marker);
            }
        }
    }
    markers
}

fn parse_annotation(node: Node, source: &[u8]) -> Option<Marker> {
    if !matches!(node.kind(), "annotation" | "marker_annotation") {
        return None;
    }
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())?;

    let mut params = BTreeMap::new();
    if let Some(args) = node.child_by_field_name("arguments") {
        let mut walker = args.walk();
        for arg in args.children(&mut walker) {
            match arg.kind() {
                "element_value_pair" => {
                    let key = arg
                        .child_by_field_name("key")
                        .map(|k| node_text(k, source).to_string())
                        .unwrap_or_else(|| "value".to_string());
                    if let Some(value) = arg.child_by_field_name("value") {
                        params.insert(key, parse_value(value, source));
                    }
                }
                "(" | ")" | "," => {}
                // A single unnamed argument is the `value` shorthand.
                _ => {
                    params.insert("value".to_string(), parse_value(arg, source));
                }
            }
        }
    }

    Some(Marker {
        name,
        params,
        span: Span::from_node(node),
    })
}

fn parse_value(node: Node, source: &[u8]) -> MarkerValue {
    match node.kind() {
        "string_literal" => MarkerValue::Str(unquote(node_text(node, source))),
        "element_value_array_initializer" => {
            let mut scalars = Vec::new();
            let mut nested = Vec::new();
            let mut walker = node.walk();
            for item in node.children(&mut walker) {
                match item.kind() {
                    "{" | "}" | "," => {}
                    "annotation" | "marker_annotation" => {
                        if let Some(marker) = parse_annotation(item, source) {
                            nested.push(marker);
                        }
                    }
                    "string_literal" => scalars.push(unquote(node_text(item, source))),
                    _ => scalars.push(node_text(item, source).trim().to_string()),
                }
            }
            if !nested.is_empty() {
                MarkerValue::Markers(nested)
            } else {
                MarkerValue::List(scalars)
            }
        }
        "annotation" | "marker_annotation" => match parse_annotation(node, source) {
            Some(marker) => MarkerValue::Markers(vec![marker]),
            None => MarkerValue::Str(node_text(node, source).trim().to_string()),
        },
        _ => MarkerValue::Str(node_text(node, source).trim().to_string()),
    }
}

fn unquote(text: &str) -> String {
    text.trim().trim_matches('"').to_string()
}

fn extract_methods(decl: Node, source: &[u8]) -> Vec<MethodFacts> {
    let body = match decl.child_by_field_name("body") {
        Some(b) => b,
        None => return Vec::new(),
    };

    let mut methods = Vec::new();
    let mut walker = body.walk();
    for child in body.children(&mut walker) {
        if child.kind() != "method_declaration" {
            continue;
        }
        let name = child
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        methods.push(MethodFacts {
            name,
            markers: extract_markers(child, source),
            params: extract_params(child, source),
            span: Span::from_node(child),
        });
    }
    methods
}

fn extract_params(method: Node, source: &[u8]) -> Vec<ParamFacts> {
    let params_node = match method.child_by_field_name("parameters") {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut params = Vec::new();
    let mut walker = params_node.walk();
    for child in params_node.children(&mut walker) {
        if !matches!(child.kind(), "formal_parameter" | "spread_parameter") {
            continue;
        }
        let name = child
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_default();
        let type_name = child
            .child_by_field_name("type")
            .map(|t| simple_type_name(node_text(t, source)))
            .unwrap_or_default();
        params.push(ParamFacts {
            name,
            type_name,
            markers: extract_markers(child, source),
        });
    }
    params
}

/// Reduce a type expression to its simple name: generics stripped, package
/// qualifiers dropped (`java.util.List<String>` becomes `List`).
fn simple_type_name(type_text: &str) -> String {
    let base = type_text.split('<').next().unwrap_or(type_text).trim();
    base.rsplit('.').next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_java(source: &str) -> FileFacts {
        JavaReader::new()
            .read_file(Path::new("Test.java"), source.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let facts = read_java(
            r#"
package com.example.app;

import java.util.List;
import static java.lang.Math.PI;
import com.example.util.*;

public class Test {}
"#,
        );
        assert_eq!(facts.package, "com.example.app");
        assert_eq!(
            facts.imports,
            vec!["java.util.List", "java.lang.Math.PI", "com.example.util.*"]
        );
        assert!(!facts.has_parse_errors);
    }

    #[test]
    fn test_class_markers_with_params() {
        let facts = read_java(
            r#"
package com.example;

@Path("/orders")
@Service
public class OrderResource {}
"#,
        );
        let class = &facts.classes[0];
        assert_eq!(class.name, "OrderResource");
        let path = class.marker("Path").unwrap();
        assert_eq!(path.param_str("value"), Some("/orders"));
        assert!(class.marker("Service").is_some());
    }

    #[test]
    fn test_method_markers_and_params() {
        let facts = read_java(
            r#"
package com.example;

@Path("/orders")
public class OrderResource {
    @GET
    @Path("/{id}")
    public String find(@PathParam("id") String id, int limit) {
        return null;
    }
}
"#,
        );
        let method = &facts.classes[0].methods[0];
        assert_eq!(method.name, "find");
        let names: Vec<_> = method.markers.iter().map(|m| m.simple_name()).collect();
        assert_eq!(names, vec!["GET", "Path"]);

        assert_eq!(method.params.len(), 2);
        assert_eq!(method.params[0].name, "id");
        assert_eq!(method.params[0].type_name, "String");
        assert_eq!(
            method.params[0].markers[0].param_str("value"),
            Some("id")
        );
        assert_eq!(method.params[1].type_name, "int");
    }

    #[test]
    fn test_list_and_enum_parameters() {
        let facts = read_java(
            r#"
package com.example;

@RequestMapping(value = {"/a", "/b"}, method = RequestMethod.GET)
public class Ctrl {}
"#,
        );
        let marker = facts.classes[0].marker("RequestMapping").unwrap();
        assert_eq!(
            marker.param("value"),
            Some(&MarkerValue::List(vec!["/a".to_string(), "/b".to_string()]))
        );
        assert_eq!(marker.param_str("method"), Some("RequestMethod.GET"));
    }

    #[test]
    fn test_nested_container_markers() {
        let facts = read_java(
            r#"
package com.example;

import annotation.ConsumesAPI;

public class Client {
    @ConsumesAPIs({
        @ConsumesAPI(path = "/a", method = "GET"),
        @ConsumesAPI(path = "/b", method = "POST")
    })
    public void call() {}
}
"#,
        );
        let marker = &facts.classes[0].methods[0].markers[0];
        assert_eq!(marker.simple_name(), "ConsumesAPIs");
        match marker.param("value") {
            Some(MarkerValue::Markers(nested)) => {
                assert_eq!(nested.len(), 2);
                assert_eq!(nested[0].param_str("path"), Some("/a"));
                assert_eq!(nested[1].param_str("method"), Some("POST"));
            }
            other => panic!("expected nested markers, got {:?}", other),
        }
    }

    #[test]
    fn test_interface_declarations_are_scanned() {
        let facts = read_java(
            r#"
package com.example;

@Path("/ping")
public interface PingApi {
    @GET
    String ping();
}
"#,
        );
        let class = &facts.classes[0];
        assert_eq!(class.name, "PingApi");
        assert!(class.marker("Path").is_some());
        assert_eq!(class.methods[0].name, "ping");
    }
}
