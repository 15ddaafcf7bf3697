//! Build orchestration for specgen.
//!
//! Ties together the overrides file, the extractor boundary, dialect
//! conversion and artifact emission into a single [`Generator::build`].

pub mod build;
pub mod extract;
pub mod overrides;

pub use build::{BuildReport, Generator};
pub use extract::{DocumentFileExtractor, ExtractRequest, Extractor};
pub use overrides::{Overrides, load_overrides, parse_overrides};
