//! Fact structures extracted from scanned Java sources.

use std::collections::BTreeMap;
use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Value of a single marker parameter.
///
/// Java annotation parameters are restricted to constant expressions; the
/// scanner projects them into three shapes: a scalar token, an array of
/// scalar tokens, or an array of nested annotations (the container form of
/// repeatable annotations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    /// A scalar value. String literals are stored unquoted and trimmed;
    /// other expressions (enum constants, numbers) keep their source text.
    Str(String),
    /// An array of scalar values.
    List(Vec<String>),
    /// An array of nested marker occurrences.
    Markers(Vec<Marker>),
}

impl MarkerValue {
    /// The scalar form of this value, if it has one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MarkerValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// All scalar items: a single-element slice view for `Str`, the items
    /// for `List`, nothing for nested markers.
    pub fn scalar_items(&self) -> Vec<&str> {
        match self {
            MarkerValue::Str(s) => vec![s.as_str()],
            MarkerValue::List(items) => items.iter().map(String::as_str).collect(),
            MarkerValue::Markers(_) => Vec::new(),
        }
    }
}

/// One declarative annotation occurrence on a class, method, or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The annotation name as written, possibly qualified
    /// (`Path` or `javax.ws.rs.Path`).
    pub name: String,
    /// Named parameters. A single unnamed argument is stored under `value`,
    /// mirroring the Java shorthand.
    pub params: BTreeMap<String, MarkerValue>,
    /// Location of the annotation.
    pub span: Span,
}

impl Marker {
    /// The unqualified annotation name (last dot segment).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&MarkerValue> {
        self.params.get(name)
    }

    /// Look up a parameter's scalar value by name.
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(MarkerValue::as_str)
    }
}

/// A method parameter declaration with its markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamFacts {
    /// Parameter name.
    pub name: String,
    /// Simple type name with generic arguments stripped (`List<String>`
    /// becomes `List`, `java.lang.String` becomes `String`).
    pub type_name: String,
    /// Markers on the parameter.
    pub markers: Vec<Marker>,
}

/// A method declaration with its markers and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFacts {
    /// Method name.
    pub name: String,
    /// Markers on the method, in declaration order.
    pub markers: Vec<Marker>,
    /// Parameter declarations, in declaration order.
    pub params: Vec<ParamFacts>,
    /// Location of the method declaration.
    pub span: Span,
}

/// A class or interface declaration, snapshotted together with the
/// package and imports of its source file so each class is self-contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFacts {
    /// Declared class or interface name.
    pub name: String,
    /// Package of the enclosing file; empty for the default package.
    pub package: String,
    /// Imports of the enclosing file, in declaration order.
    pub imports: Vec<String>,
    /// Class-level markers, in declaration order.
    pub markers: Vec<Marker>,
    /// Method declarations, in declaration order.
    pub methods: Vec<MethodFacts>,
    /// Location of the class declaration.
    pub span: Span,
}

impl ClassFacts {
    /// Find the first class-level marker with the given simple name.
    pub fn marker(&self, simple_name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.simple_name() == simple_name)
    }

    /// Whether the import list contains the given fully-qualified name.
    pub fn imports_contain(&self, fqn: &str) -> bool {
        self.imports.iter().any(|i| i == fqn)
    }
}

/// All facts extracted from a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFacts {
    /// File path, relative to the scanned root.
    pub path: String,
    /// Declared package; empty for the default package.
    pub package: String,
    /// Import declarations, in declaration order.
    pub imports: Vec<String>,
    /// Classes and interfaces declared in the file.
    pub classes: Vec<ClassFacts>,
    /// Whether the parse tree contained error nodes.
    pub has_parse_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span {
            start_byte: 0,
            end_byte: 1,
            start_line: 1,
            start_col: 1,
        }
    }

    #[test]
    fn test_marker_simple_name() {
        let qualified = Marker {
            name: "javax.ws.rs.Path".to_string(),
            params: BTreeMap::new(),
            span: span(),
        };
        assert_eq!(qualified.simple_name(), "Path");

        let plain = Marker {
            name: "GetMapping".to_string(),
            params: BTreeMap::new(),
            span: span(),
        };
        assert_eq!(plain.simple_name(), "GetMapping");
    }

    #[test]
    fn test_marker_value_scalar_items() {
        assert_eq!(
            MarkerValue::Str("a".to_string()).scalar_items(),
            vec!["a"]
        );
        assert_eq!(
            MarkerValue::List(vec!["a".to_string(), "b".to_string()]).scalar_items(),
            vec!["a", "b"]
        );
        assert!(MarkerValue::Markers(Vec::new()).scalar_items().is_empty());
    }
}
