//! Shared types, error model, and configuration for specgen.
//!
//! This crate is the foundation depended on by all other specgen crates.
//! It provides:
//! - [`SpecgenError`], the unified error type
//! - Domain types ([`Document`], [`Dialect`], [`DocInfo`])
//! - Configuration ([`BuildConfig`], [`ParseOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BuildConfig, CONFIG_FILE_NAME, DEFAULT_INSTANCE_NAME, DEFAULT_LEFT_DELIM,
    DEFAULT_OVERRIDES_FILE, DEFAULT_RIGHT_DELIM, DependencyLevel, ParseOptions, load_config,
    load_config_from, split_list,
};
pub use error::{Result, SpecgenError};
pub use types::{Dialect, DocInfo, Document, LEGACY_VERSION, OPENAPI_VERSION};
