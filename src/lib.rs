//! archmap - static analysis of Java source trees.
//!
//! archmap inspects a tree of Java sources without compiling or running
//! them and produces two structured facts about a module:
//!
//! - which internal components depend on which other components, derived
//!   from imports and directory structure at configurable granularity
//! - which REST endpoints the module offers and which external services it
//!   declares calls to, derived from annotation markers in two dialects
//!
//! # Architecture
//!
//! - `model`: tree-sitter-backed scanner producing a read-only source model
//! - `analyze`: the three analyzers consuming the model (components,
//!   offered API, consumed API)
//! - `config`: YAML/CLI configuration
//! - `report`: JSON and terminal output
//!
//! Every analyzer is fail-soft: defective files or markers are logged and
//! skipped, and a run always completes with a (possibly partial) result.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

pub use analyze::{
    ComponentGraph, ConsumeConfig, ConsumeDescription, DialectTables, HttpMethod,
    OfferConfig, OfferDescription,
};
pub use config::AnalysisConfig;
pub use error::ConfigError;
pub use model::SourceModel;
