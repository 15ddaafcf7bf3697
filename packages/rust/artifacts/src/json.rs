use specgen_shared::{Document, Result};

use crate::{ArtifactKind, ArtifactWriter, EmitContext};

/// `swagger.json`: the document with 4-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl ArtifactWriter for JsonWriter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::StructuredFile
    }

    fn render(&self, doc: &Document, _ctx: &EmitContext<'_>) -> Result<Vec<u8>> {
        doc.to_json_pretty()
    }
}
