//! Source model: a queryable, read-only projection of a Java source tree.
//!
//! The scanner parses every `.java` file under a root with tree-sitter and
//! exposes, per class: package, imports, class-level and method-level
//! markers with their named parameters, and method parameter declarations
//! with their own markers. Nothing here interprets the markers; the
//! analyzers in [`crate::analyze`] do.

mod facts;
mod java;
mod scanner;

pub use facts::{ClassFacts, FileFacts, Marker, MarkerValue, MethodFacts, ParamFacts, Span};
pub use java::JavaReader;
pub use scanner::SourceModel;
