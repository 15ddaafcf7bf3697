//! Artifact emission for specgen.
//!
//! Each output kind has an [`ArtifactWriter`] that renders a document to
//! bytes; [`emit`] resolves the file name and writes the bytes atomically.

mod json;
pub mod multiline;
mod naming;
mod source;
mod write;
mod yaml;

use std::path::Path;

use tracing::{debug, instrument};

use specgen_shared::{BuildConfig, DocInfo, Document, Result};

pub use json::JsonWriter;
pub use multiline::format_multiline_descriptions;
pub use naming::ArtifactKind;
pub use source::{SourceWriter, build_template, format_source, raw_string_literal};
pub use write::{ArtifactMeta, write_atomic};
pub use yaml::YamlWriter;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Everything a writer needs besides the document itself.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub instance_name: &'a str,
    pub state: &'a str,
    pub left_delim: &'a str,
    pub right_delim: &'a str,
    /// Stamp the generation time into source headers.
    pub generated_time: bool,
    /// Metadata read from the document before any conversion.
    pub info: &'a DocInfo,
}

impl<'a> EmitContext<'a> {
    /// Context for a config that already went through `apply_defaults`.
    pub fn new(config: &'a BuildConfig, info: &'a DocInfo) -> Self {
        Self {
            instance_name: &config.instance_name,
            state: &config.state,
            left_delim: &config.left_template_delim,
            right_delim: &config.right_template_delim,
            generated_time: config.generated_time,
            info,
        }
    }

    /// File name of `kind` under this context's state and instance name.
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        kind.file_name(self.state, self.instance_name)
    }
}

/// Renders a document into the bytes of one artifact kind.
pub trait ArtifactWriter: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    fn render(&self, doc: &Document, ctx: &EmitContext<'_>) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Writers by artifact kind.
pub struct WriterRegistry {
    writers: Vec<Box<dyn ArtifactWriter>>,
}

impl WriterRegistry {
    /// A registry with the three built-in writers.
    pub fn new() -> Self {
        Self {
            writers: vec![
                Box::new(SourceWriter),
                Box::new(JsonWriter),
                Box::new(YamlWriter),
            ],
        }
    }

    /// Add a writer, replacing any writer of the same kind.
    pub fn register(&mut self, writer: Box<dyn ArtifactWriter>) {
        self.writers.retain(|w| w.kind() != writer.kind());
        self.writers.push(writer);
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&dyn ArtifactWriter> {
        self.writers
            .iter()
            .find(|w| w.kind() == kind)
            .map(|w| w.as_ref())
    }

    /// Look up the writer for a requested output type (`rs`, `json`, `yml`, ...).
    pub fn for_output_type(&self, output_type: &str) -> Option<&dyn ArtifactWriter> {
        ArtifactKind::from_output_type(output_type).and_then(|kind| self.get(kind))
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Render `doc` with `writer` and write it into `output_dir`.
#[instrument(skip_all, fields(kind = %writer.kind()))]
pub fn emit(
    writer: &dyn ArtifactWriter,
    doc: &Document,
    ctx: &EmitContext<'_>,
    output_dir: &Path,
) -> Result<ArtifactMeta> {
    let kind = writer.kind();
    let path = output_dir.join(ctx.file_name(kind));
    let content = writer.render(doc, ctx)?;

    write_atomic(&path, &content)?;
    debug!(path = %path.display(), size = content.len(), "wrote artifact");

    Ok(ArtifactMeta::new(kind, path, &content))
}
