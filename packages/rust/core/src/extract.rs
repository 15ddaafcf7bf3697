//! Boundary to the component that produces the API description.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use specgen_shared::{BuildConfig, Document, ParseOptions, Result, SpecgenError};

use crate::overrides::Overrides;

/// Everything an extractor is handed for one build.
#[derive(Debug, Clone)]
pub struct ExtractRequest<'a> {
    pub search_dirs: Vec<PathBuf>,
    pub main_api_file: &'a str,
    pub excludes: &'a [String],
    pub parse_depth: u32,
    pub options: &'a ParseOptions,
    pub overrides: Option<&'a Overrides>,
    pub state: &'a str,
}

impl<'a> ExtractRequest<'a> {
    pub fn new(config: &'a BuildConfig, overrides: Option<&'a Overrides>) -> Self {
        Self {
            search_dirs: config.search_paths(),
            main_api_file: &config.main_api_file,
            excludes: &config.excludes,
            parse_depth: config.parse_depth,
            options: &config.parse,
            overrides,
            state: &config.state,
        }
    }
}

/// Produces the API description a build emits.
pub trait Extractor {
    fn extract(&self, request: &ExtractRequest<'_>) -> Result<Document>;
}

/// Reads an already-assembled description from disk.
///
/// The main API file is looked up in each search directory in order and
/// parsed by extension (`.json`, `.yaml`, `.yml`). Parse flags and overrides
/// only matter to extractors that read annotated sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFileExtractor;

impl Extractor for DocumentFileExtractor {
    #[instrument(skip_all, fields(main_api_file = request.main_api_file))]
    fn extract(&self, request: &ExtractRequest<'_>) -> Result<Document> {
        let path = locate(request)?;
        debug!(path = %path.display(), "reading description");

        let content = std::fs::read_to_string(&path).map_err(|e| SpecgenError::io(&path, e))?;
        parse_description(&path, &content)
    }
}

fn locate(request: &ExtractRequest<'_>) -> Result<PathBuf> {
    for dir in &request.search_dirs {
        if request.excludes.iter().any(|ex| Path::new(ex) == dir.as_path()) {
            continue;
        }
        let candidate = dir.join(request.main_api_file);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(SpecgenError::extraction(format!(
        "cannot find {} in any search directory",
        request.main_api_file
    )))
}

fn parse_description(path: &Path, content: &str) -> Result<Document> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => Document::from_json(content),
        "yaml" | "yml" => {
            let value: serde_json::Value = serde_yaml::from_str(content).map_err(|e| {
                SpecgenError::extraction(format!("invalid YAML in {}: {e}", path.display()))
            })?;
            Document::from_value(value)
        }
        _ => Err(SpecgenError::extraction(format!(
            "unsupported description format: {}",
            path.display()
        ))),
    }
}
