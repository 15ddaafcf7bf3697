//! `docs.rs`: the document embedded in a Rust source unit.
//!
//! The unit holds the document as a template string with placeholders for
//! the metadata fields, a `spec_info` function returning the metadata record
//! and a `register` function that adds it to a `specgen_runtime::Registry`.

use std::fmt::Write as _;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::warn;

use specgen_shared::{DEFAULT_INSTANCE_NAME, Dialect, Document, Result};

use crate::{ArtifactKind, ArtifactWriter, EmitContext};

const HEADER: &str = "// Code generated by specgen. DO NOT EDIT.\n";

/// Writer for the generated source unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceWriter;

impl ArtifactWriter for SourceWriter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::SourceConstant
    }

    fn render(&self, doc: &Document, ctx: &EmitContext<'_>) -> Result<Vec<u8>> {
        let template = build_template(doc, ctx)?;
        let code = format_source(&source_unit(&template, ctx));

        let mut out = String::from(HEADER);
        if ctx.generated_time {
            let _ = writeln!(
                out,
                "// This file was generated at {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S%.f UTC")
            );
        }
        out.push('\n');
        out.push_str(&code);
        Ok(out.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Serialize `doc` with its metadata fields replaced by placeholders.
///
/// Left delimiters already present in the document are escaped as
/// `<L>ldelim<R>` so rendering restores them verbatim. Legacy documents get
/// their `schemes` as a `marshal` placeholder at the top of the object.
pub fn build_template(doc: &Document, ctx: &EmitContext<'_>) -> Result<String> {
    let (left, right) = (ctx.left_delim, ctx.right_delim);
    let placeholder = |action: &str| format!("{left}{action}{right}");
    let legacy = doc.dialect() == Some(Dialect::Swagger2);

    let mut map = escape_map(doc.as_map(), left, right);

    if let Some(Value::Object(info)) = map.get_mut("info") {
        info.insert("title".into(), Value::String(placeholder(".Title")));
        info.insert("version".into(), Value::String(placeholder(".Version")));
        info.insert(
            "description".into(),
            Value::String(placeholder("escape .Description")),
        );
    }

    if legacy {
        map.insert("host".into(), Value::String(placeholder(".Host")));
        map.insert("basePath".into(), Value::String(placeholder(".BasePath")));
        map.remove("schemes");
    } else if !ctx.info.host.is_empty() {
        let url = format!("http://{}{}", ctx.info.host, ctx.info.base_path);
        let templated = format!("http://{}{}", placeholder(".Host"), placeholder(".BasePath"));
        if let Some(Value::Array(servers)) = map.get_mut("servers") {
            for server in servers.iter_mut() {
                if server.get("url").and_then(Value::as_str) == Some(url.as_str()) {
                    server["url"] = Value::String(templated.clone());
                }
            }
        }
    }

    let pretty = Document::from(map).to_json_pretty()?;
    let text = String::from_utf8_lossy(&pretty).into_owned();

    if legacy {
        Ok(inject_schemes(&text, &placeholder(" marshal .Schemes ")))
    } else {
        Ok(text)
    }
}

/// Put `"schemes": <placeholder>` right after the opening brace.
fn inject_schemes(text: &str, placeholder: &str) -> String {
    let Some(rest) = text.strip_prefix('{') else {
        return text.to_string();
    };
    if rest.trim() == "}" {
        format!("{{\n    \"schemes\": {placeholder}\n}}")
    } else {
        format!("{{\n    \"schemes\": {placeholder},{rest}")
    }
}

fn escape_map(map: &Map<String, Value>, left: &str, right: &str) -> Map<String, Value> {
    let escaped = format!("{left}ldelim{right}");
    map.iter()
        .map(|(key, value)| {
            (
                key.replace(left, &escaped),
                escape_value(value, left, &escaped),
            )
        })
        .collect()
}

fn escape_value(value: &Value, left: &str, escaped: &str) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace(left, escaped)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| escape_value(item, left, escaped))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| {
                    (
                        key.replace(left, escaped),
                        escape_value(child, left, escaped),
                    )
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Source unit
// ---------------------------------------------------------------------------

/// Raw string literal for `content` with enough `#`s that nothing inside
/// can close it.
pub fn raw_string_literal(content: &str) -> String {
    let mut longest = 0;
    for (i, _) in content.match_indices('"') {
        let run = content[i + 1..].chars().take_while(|&c| c == '#').count();
        longest = longest.max(run);
    }
    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{content}\"{hashes}")
}

/// `_<instance>_<state>` for non-default names, as identifier characters.
fn identifier_suffix(instance_name: &str, state: &str) -> String {
    let instance = (instance_name != DEFAULT_INSTANCE_NAME).then_some(instance_name);
    let mut suffix = String::new();
    for part in [instance, Some(state)].into_iter().flatten() {
        if part.is_empty() {
            continue;
        }
        suffix.push('_');
        suffix.extend(
            part.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
        );
    }
    suffix
}

fn source_unit(template: &str, ctx: &EmitContext<'_>) -> String {
    let suffix = identifier_suffix(ctx.instance_name, ctx.state);
    let const_name = format!("DOC_TEMPLATE{}", suffix.to_ascii_uppercase());
    let fn_suffix = suffix.to_ascii_lowercase();
    let info = ctx.info;
    let schemes = info
        .schemes
        .iter()
        .map(|s| format!("{s:?}.into()"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"use specgen_runtime::{{Registry, SpecInfo}};

pub const {const_name}: &str = {literal};

/// Metadata record of the generated document.
pub fn spec_info{fn_suffix}() -> SpecInfo {{
    SpecInfo {{
        version: {version:?}.into(),
        host: {host:?}.into(),
        base_path: {base_path:?}.into(),
        schemes: vec![{schemes}],
        title: {title:?}.into(),
        description: {description:?}.into(),
        instance_name: {instance:?}.into(),
        template: {const_name}.into(),
        left_delim: {left:?}.into(),
        right_delim: {right:?}.into(),
    }}
}}

/// Register the document under its instance name.
pub fn register{fn_suffix}(registry: &mut Registry) {{
    registry.register(spec_info{fn_suffix}());
}}
"#,
        literal = raw_string_literal(template),
        version = info.version,
        host = info.host,
        base_path = info.base_path,
        title = info.title,
        description = info.description,
        instance = ctx.instance_name,
        left = ctx.left_delim,
        right = ctx.right_delim,
    )
}

/// Pretty-print generated source. Text that does not parse is returned
/// unchanged.
pub fn format_source(code: &str) -> String {
    match syn::parse_file(code) {
        Ok(file) => prettyplease::unparse(&file),
        Err(e) => {
            warn!(error = %e, "generated source does not parse, writing it unformatted");
            code.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use specgen_shared::{BuildConfig, DocInfo};

    fn config(instance: &str, state: &str) -> BuildConfig {
        let mut config = BuildConfig {
            instance_name: instance.into(),
            state: state.into(),
            ..BuildConfig::default()
        };
        config.apply_defaults();
        config
    }

    fn legacy_doc() -> Document {
        Document::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "Pets", "version": "1.0", "description": "All \"pets\""},
            "host": "localhost:8080",
            "basePath": "/v1",
            "schemes": ["http", "https"],
            "paths": {"/pets": {"get": {"summary": "List {{pets}}", "responses": {}}}}
        }))
        .unwrap()
    }

    fn render_text(doc: &Document, config: &BuildConfig) -> String {
        let info = doc.info();
        let ctx = EmitContext::new(config, &info);
        String::from_utf8(SourceWriter.render(doc, &ctx).unwrap()).unwrap()
    }

    #[test]
    fn legacy_template_has_placeholders_and_schemes() {
        let doc = legacy_doc();
        let config = config("", "");
        let info = doc.info();
        let template = build_template(&doc, &EmitContext::new(&config, &info)).unwrap();

        assert!(template.starts_with("{\n    \"schemes\": {{ marshal .Schemes }},\n"));
        assert!(template.contains(r#""title": "{{.Title}}""#));
        assert!(template.contains(r#""description": "{{escape .Description}}""#));
        assert!(template.contains(r#""host": "{{.Host}}""#));
        assert!(template.contains(r#""basePath": "{{.BasePath}}""#));
        assert!(template.contains("List {{ldelim}}pets}}"));
        assert_eq!(template.matches("\"schemes\"").count(), 1);
    }

    #[test]
    fn empty_legacy_document_gets_schemes_without_comma() {
        let doc = Document::from_value(json!({})).unwrap();
        assert_eq!(inject_schemes("{}", "{{ marshal .Schemes }}"), "{\n    \"schemes\": {{ marshal .Schemes }}\n}");
        // No dialect tag: nothing is injected.
        let config = config("", "");
        let info = DocInfo::default();
        assert_eq!(build_template(&doc, &EmitContext::new(&config, &info)).unwrap(), "{}");
    }

    #[test]
    fn converted_template_has_no_schemes_and_templated_server() {
        let doc = Document::from_value(json!({
            "openapi": "3.0.0",
            "info": {"title": "Pets", "version": "1.0"},
            "servers": [{"url": "http://localhost:8080/v1"}, {"url": "https://other"}],
            "paths": {}
        }))
        .unwrap();
        let config = config("", "");
        let info = DocInfo {
            host: "localhost:8080".into(),
            base_path: "/v1".into(),
            ..DocInfo::default()
        };
        let template = build_template(&doc, &EmitContext::new(&config, &info)).unwrap();

        assert!(!template.contains("schemes"));
        assert!(template.contains(r#""url": "http://{{.Host}}{{.BasePath}}""#));
        assert!(template.contains(r#""url": "https://other""#));
        assert!(!template.contains("\"host\""));
    }

    #[test]
    fn custom_delimiters() {
        let doc = legacy_doc();
        let mut config = config("", "");
        config.left_template_delim = "[[".into();
        config.right_template_delim = "]]".into();
        let info = doc.info();
        let template = build_template(&doc, &EmitContext::new(&config, &info)).unwrap();

        assert!(template.contains(r#""title": "[[.Title]]""#));
        assert!(template.contains("[[ marshal .Schemes ]]"));
        assert!(template.contains("List {{pets}}"));
    }

    #[test]
    fn raw_literal_outlasts_hash_runs() {
        assert_eq!(raw_string_literal("plain"), "r#\"plain\"#");
        assert_eq!(raw_string_literal("a \"# b"), "r##\"a \"# b\"##");
        assert_eq!(raw_string_literal("\"### \"#"), "r####\"\"### \"#\"####");
        assert_eq!(raw_string_literal("# no quote ###"), "r#\"# no quote ###\"#");
    }

    #[test]
    fn default_names_have_no_suffix() {
        let text = render_text(&legacy_doc(), &config("", ""));
        assert!(text.starts_with(HEADER));
        assert!(text.contains("pub const DOC_TEMPLATE: &str"));
        assert!(text.contains("r#\"{"));
        assert!(text.contains("pub fn spec_info() -> SpecInfo"));
        assert!(text.contains("pub fn register(registry: &mut Registry)"));
        assert!(text.contains("use specgen_runtime::{Registry, SpecInfo};"));
        assert!(!text.contains("generated at"));
    }

    #[test]
    fn instance_and_state_suffix() {
        let text = render_text(&legacy_doc(), &config("billing-v2", "staging"));
        assert!(text.contains("pub const DOC_TEMPLATE_BILLING_V2_STAGING: &str"));
        assert!(text.contains("pub fn spec_info_billing_v2_staging() -> SpecInfo"));
        assert!(text.contains("pub fn register_billing_v2_staging(registry: &mut Registry)"));
        assert!(text.contains("instance_name: \"billing-v2\".into()"));
    }

    #[test]
    fn metadata_record_carries_doc_info() {
        let text = render_text(&legacy_doc(), &config("", ""));
        assert!(text.contains("host: \"localhost:8080\".into()"));
        assert!(text.contains("base_path: \"/v1\".into()"));
        assert!(text.contains("\"https\".into()"));
        assert!(text.contains("description: \"All \\\"pets\\\"\".into()"));
    }

    #[test]
    fn generated_time_adds_timestamp_line() {
        let mut config = config("", "");
        config.generated_time = true;
        let text = render_text(&legacy_doc(), &config);
        assert!(text.lines().nth(1).unwrap().starts_with("// This file was generated at "));
    }

    #[test]
    fn generated_source_parses() {
        let text = render_text(&legacy_doc(), &config("billing", ""));
        assert!(syn::parse_file(&text).is_ok());
    }

    #[test]
    fn rendered_template_reproduces_the_document() {
        let doc = legacy_doc();
        let config = config("", "");
        let info = doc.info();
        let template = build_template(&doc, &EmitContext::new(&config, &info)).unwrap();

        let spec = specgen_runtime::SpecInfo {
            version: info.version.clone(),
            host: info.host.clone(),
            base_path: info.base_path.clone(),
            schemes: info.schemes.clone(),
            title: info.title.clone(),
            description: info.description.clone(),
            instance_name: config.instance_name.clone(),
            template,
            left_delim: config.left_template_delim.clone(),
            right_delim: config.right_template_delim.clone(),
        };
        let rendered: serde_json::Value = serde_json::from_str(&spec.read_doc().unwrap()).unwrap();
        assert_eq!(rendered, doc.into_value());
    }

    #[test]
    fn unparsable_source_is_kept_as_is() {
        let code = "pub fn broken( {";
        assert_eq!(format_source(code), code);
    }
}
