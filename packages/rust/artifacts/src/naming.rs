//! Artifact kinds and the file naming rule.

use std::fmt;

use serde::Serialize;

use specgen_shared::DEFAULT_INSTANCE_NAME;

/// The three artifacts a build can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Rust source unit embedding the document.
    SourceConstant,
    /// Pretty-printed JSON.
    StructuredFile,
    /// YAML.
    TextFile,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::SourceConstant,
        ArtifactKind::StructuredFile,
        ArtifactKind::TextFile,
    ];

    /// File name before the state and instance prefixes.
    pub fn base_name(self) -> &'static str {
        match self {
            ArtifactKind::SourceConstant => "docs.rs",
            ArtifactKind::StructuredFile => "swagger.json",
            ArtifactKind::TextFile => "swagger.yaml",
        }
    }

    /// Resolve a requested output type. Matching ignores case and
    /// surrounding whitespace.
    pub fn from_output_type(output_type: &str) -> Option<Self> {
        match output_type.trim().to_ascii_lowercase().as_str() {
            "rs" | "rust" => Some(ArtifactKind::SourceConstant),
            "json" => Some(ArtifactKind::StructuredFile),
            "yaml" | "yml" => Some(ArtifactKind::TextFile),
            _ => None,
        }
    }

    /// Resolved file name: `[<state>_][<instance>_]<base-name>`.
    pub fn file_name(self, state: &str, instance_name: &str) -> String {
        let mut name = String::new();
        if !state.is_empty() {
            name.push_str(state);
            name.push('_');
        }
        if !instance_name.is_empty() && instance_name != DEFAULT_INSTANCE_NAME {
            name.push_str(instance_name);
            name.push('_');
        }
        name.push_str(self.base_name());
        name
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::SourceConstant => "source-constant",
            ArtifactKind::StructuredFile => "structured-file",
            ArtifactKind::TextFile => "text-file",
        })
    }
}
