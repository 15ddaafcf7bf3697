//! Build configuration for specgen.
//!
//! A build is described by `specgen.toml` in the working directory.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecgenError};
use crate::types::Dialect;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "specgen.toml";

/// Overrides file looked up when none is configured. Its absence is not an error.
pub const DEFAULT_OVERRIDES_FILE: &str = ".swaggo";

/// Instance name used when none is configured. Never prefixed onto artifact names.
pub const DEFAULT_INSTANCE_NAME: &str = "swagger";

/// Template delimiters used when none are configured.
pub const DEFAULT_LEFT_DELIM: &str = "{{";
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

// ---------------------------------------------------------------------------
// Config structs (matching specgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level build config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directories the extractor searches.
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<String>,

    /// Directories and files the extractor skips.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Entry point holding the general API info.
    #[serde(default = "default_main_api_file")]
    pub main_api_file: String,

    /// Directory all artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Requested artifact kinds: `rs`, `json`, `yaml`.
    #[serde(default = "default_output_types")]
    pub output_types: Vec<String>,

    /// Distinguishes independently generated documents in one project.
    #[serde(default)]
    pub instance_name: String,

    /// Optional variant prefix for alternate artifact sets.
    #[serde(default)]
    pub state: String,

    /// Dialect the artifacts are written in.
    #[serde(default)]
    pub target_dialect: Dialect,

    /// Type overrides file.
    #[serde(default = "default_overrides_file")]
    pub overrides_file: String,

    /// Left delimiter of placeholders in the generated source template.
    #[serde(default)]
    pub left_template_delim: String,

    /// Right delimiter of placeholders in the generated source template.
    #[serde(default)]
    pub right_template_delim: String,

    /// Stamp the generation time into the generated source header.
    #[serde(default)]
    pub generated_time: bool,

    /// Dependency parse depth handed to the extractor.
    #[serde(default = "default_parse_depth")]
    pub parse_depth: u32,

    /// Extractor behaviour flags.
    #[serde(default)]
    pub parse: ParseOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            search_dirs: default_search_dirs(),
            excludes: Vec::new(),
            main_api_file: default_main_api_file(),
            output_dir: default_output_dir(),
            output_types: default_output_types(),
            instance_name: String::new(),
            state: String::new(),
            target_dialect: Dialect::default(),
            overrides_file: default_overrides_file(),
            left_template_delim: String::new(),
            right_template_delim: String::new(),
            generated_time: false,
            parse_depth: default_parse_depth(),
            parse: ParseOptions::default(),
        }
    }
}

fn default_search_dirs() -> Vec<String> {
    vec!["./".into()]
}
fn default_main_api_file() -> String {
    "swagger.json".into()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./docs")
}
fn default_output_types() -> Vec<String> {
    vec!["rs".into(), "json".into(), "yaml".into()]
}
fn default_overrides_file() -> String {
    DEFAULT_OVERRIDES_FILE.into()
}
fn default_parse_depth() -> u32 {
    100
}

/// How far the extractor follows dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyLevel {
    #[default]
    None,
    Models,
    Operations,
    All,
}

/// `[parse]` section: flags passed through to the extractor untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub parse_vendor: bool,
    #[serde(default)]
    pub parse_internal: bool,
    #[serde(default)]
    pub parse_dependency: DependencyLevel,
    #[serde(default)]
    pub use_struct_names: bool,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub required_by_default: bool,
    #[serde(default)]
    pub parse_func_body: bool,
    /// `camelcase`, `snakecase` or `pascalcase`.
    #[serde(default)]
    pub prop_naming_strategy: String,
    /// Only include operations carrying one of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BuildConfig {
    /// Fill values left unset with their built-in defaults.
    pub fn apply_defaults(&mut self) {
        if self.instance_name.is_empty() {
            self.instance_name = DEFAULT_INSTANCE_NAME.into();
        }
        if self.left_template_delim.is_empty() {
            self.left_template_delim = DEFAULT_LEFT_DELIM.into();
        }
        if self.right_template_delim.is_empty() {
            self.right_template_delim = DEFAULT_RIGHT_DELIM.into();
        }
    }

    /// Reject configurations a build cannot run with.
    pub fn validate(&self) -> Result<()> {
        for dir in &self.search_dirs {
            if !Path::new(dir).exists() {
                return Err(SpecgenError::config(format!("dir: {dir} does not exist")));
            }
        }

        if self.output_types.is_empty() {
            return Err(SpecgenError::config("no output types requested"));
        }

        for delim in [&self.left_template_delim, &self.right_template_delim] {
            if delim.contains(['"', '\\']) || delim.chars().any(char::is_whitespace) {
                return Err(SpecgenError::config(format!(
                    "template delimiter {delim:?} must not contain quotes, backslashes or whitespace"
                )));
            }
            if occurs_in_json_syntax(delim) {
                return Err(SpecgenError::config(format!(
                    "template delimiter {delim:?} can occur in JSON syntax"
                )));
            }
        }
        if self.left_template_delim == self.right_template_delim {
            return Err(SpecgenError::config(
                "left and right template delimiters must differ",
            ));
        }

        Ok(())
    }

    /// Search directories as paths.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search_dirs.iter().map(PathBuf::from).collect()
    }
}

/// Whether pretty-printed JSON can contain `delim` outside string contents.
///
/// Delimiters are free of whitespace and quotes, so outside strings they can
/// only match inside one run of punctuation, a literal or an escape sequence.
/// Escape payloads and literals start with an alphanumeric or `-`, `+`, `.`.
fn occurs_in_json_syntax(delim: &str) -> bool {
    const PUNCTUATION_RUNS: [&str; 3] = ["{},", "[],", ":"];

    let starts_in_token = delim
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'));
    starts_in_token || PUNCTUATION_RUNS.iter().any(|run| run.contains(delim))
}

/// Split a comma-separated flag value into trimmed, non-empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `specgen.toml` from the given directory. Returns defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<BuildConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(BuildConfig::default());
    }

    load_config_from(&path)
}

/// Load the build config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SpecgenError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SpecgenError::config(format!("failed to parse {}: {e}", path.display())))
}
