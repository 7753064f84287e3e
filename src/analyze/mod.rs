//! Analyzers over the scanned source model.
//!
//! Three independent analyses share one [`crate::model::SourceModel`]:
//!
//! - `components`: import-based dependency graph between package-level
//!   components at configurable granularity
//! - `offers`: endpoints the module exposes, per package
//! - `consumes`: declared calls to other services, per package
//!
//! Each is a pure function of the source tree and its configuration; a
//! defect in one file or marker is logged and skipped, never fatal.

pub mod basepath;
pub mod components;
pub mod consumes;
pub mod dialects;
pub mod offers;
pub mod paths;
pub mod types;

pub use components::{analyze as analyze_components, filter_whitelist, WhitelistEntry};
pub use consumes::{extract as extract_consumes, ConsumeConfig};
pub use dialects::{DialectTables, EndpointDialect, PathMethodFact};
pub use offers::{extract as extract_offers, OfferConfig};
pub use types::{
    ComponentGraph, ConsumeDescription, HttpMethod, OfferDescription, ALL_METHODS, DEFAULT_SERVICE,
};
