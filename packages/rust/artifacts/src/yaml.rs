use specgen_shared::{Document, Result, SpecgenError};

use crate::multiline::format_multiline_descriptions;
use crate::{ArtifactKind, ArtifactWriter, EmitContext};

/// `swagger.yaml`: the document as YAML with block-scalar descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlWriter;

impl ArtifactWriter for YamlWriter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::TextFile
    }

    fn render(&self, doc: &Document, _ctx: &EmitContext<'_>) -> Result<Vec<u8>> {
        let yaml = serde_yaml::to_string(doc.as_map())
            .map_err(|e| SpecgenError::serialization(format!("cannot encode YAML: {e}")))?;
        Ok(format_multiline_descriptions(&yaml).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use specgen_shared::{BuildConfig, DocInfo};

    fn render(value: Value) -> String {
        let doc = Document::from_value(value).unwrap();
        let config = BuildConfig::default();
        let info = DocInfo::default();
        let out = YamlWriter.render(&doc, &EmitContext::new(&config, &info)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn yaml_reads_back_as_the_same_document() {
        let value = json!({
            "swagger": "2.0",
            "info": {"title": "Pets", "description": "<p>Pets: all of them</p>\nsecond line"},
            "tags": [{"name": "pets", "description": "Everything about: <b>pets</b>"}],
            "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
        });
        let text = render(value.clone());

        let back: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn multiline_descriptions_are_not_quoted() {
        let text = render(json!({"info": {"description": "line one\nline two: yes"}}));
        assert!(!text.contains("\\n"), "{text}");
        assert!(text.contains("line two: yes"));
    }

    #[test]
    fn markup_descriptions_are_written_as_blocks() {
        let text = render(json!({"info": {"description": "Everything about: <b>pets</b>"}}));
        assert!(
            text.contains("  description: |-\n    Everything about: <b>pets</b>\n"),
            "{text}"
        );
        assert!(!text.contains("'Everything"), "{text}");

        let back: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back["info"]["description"], "Everything about: <b>pets</b>");
    }
}
