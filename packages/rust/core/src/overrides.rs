//! Type override directives (`.swaggo`).
//!
//! ```text
//! // comments and blank lines are ignored
//! skip time.Time
//! replace models.Foo models.Bar
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use specgen_shared::{DEFAULT_OVERRIDES_FILE, Result, SpecgenError};

/// Type identifier → replacement, ordered by identifier.
///
/// A skipped type is stored with an empty replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: BTreeMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, ty: &str, replacement: &str) {
        self.entries.insert(ty.to_string(), replacement.to_string());
    }

    /// The raw directive value: `""` for a skip, otherwise the replacement.
    pub fn get(&self, ty: &str) -> Option<&str> {
        self.entries.get(ty).map(String::as_str)
    }

    pub fn is_skipped(&self, ty: &str) -> bool {
        self.get(ty) == Some("")
    }

    pub fn replacement(&self, ty: &str) -> Option<&str> {
        self.get(ty).filter(|r| !r.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse override directives, one per line.
pub fn parse_overrides(reader: impl BufRead) -> Result<Overrides> {
    let mut overrides = Overrides::new();

    for line in reader.lines() {
        let line = line.map_err(|source| SpecgenError::OverridesRead { source })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match tokens.as_slice() {
            ["skip", ty] => overrides.insert(ty, ""),
            ["replace", ty, replacement] => overrides.insert(ty, replacement),
            _ => return Err(SpecgenError::OverridesSyntax { line: line.clone() }),
        }
    }

    Ok(overrides)
}

/// Load the overrides file named by the config.
///
/// An empty name, or the default name when that file does not exist, means
/// no overrides. Any other file that cannot be opened is an error.
pub fn load_overrides(file: &str) -> Result<Option<Overrides>> {
    if file.is_empty() {
        return Ok(None);
    }

    let path = Path::new(file);
    let handle = match File::open(path) {
        Ok(handle) => handle,
        Err(e) if e.kind() == ErrorKind::NotFound && file == DEFAULT_OVERRIDES_FILE => {
            debug!(file, "no overrides file");
            return Ok(None);
        }
        Err(e) => return Err(SpecgenError::io(path, e)),
    };

    debug!(file, "using overrides");
    parse_overrides(BufReader::new(handle)).map(Some)
}
