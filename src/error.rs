//! Error types.
//!
//! Most defects in scanned trees are handled fail-soft: logged and skipped
//! so a run always completes with a (possibly partial) result. Only broken
//! configuration aborts a run, through [`ConfigError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or merging analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid whitelist entry {entry:?}: expected COMPONENT=DEPTH with a non-negative depth")]
    InvalidWhitelistEntry { entry: String },
}
