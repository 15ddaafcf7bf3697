//! Placeholder substitution for document templates.
//!
//! A placeholder is `<left> action <right>` where action is one of:
//!
//! - `.Field` or `escape .Field`: the field as the body of a JSON string
//! - `marshal .Field`: the field encoded as a JSON value
//! - `ldelim`: the literal left delimiter
//!
//! Fields are `Version`, `Host`, `BasePath`, `Schemes`, `Title`,
//! `Description` and `InstanceName`.

use crate::{RenderError, SpecInfo};

enum Field<'a> {
    Text(&'a str),
    List(&'a [String]),
}

fn lookup<'a>(info: &'a SpecInfo, name: &str) -> Option<Field<'a>> {
    let field = match name {
        "Version" => Field::Text(&info.version),
        "Host" => Field::Text(&info.host),
        "BasePath" => Field::Text(&info.base_path),
        "Title" => Field::Text(&info.title),
        "Description" => Field::Text(&info.description),
        "InstanceName" => Field::Text(&info.instance_name),
        "Schemes" => Field::List(&info.schemes),
        _ => return None,
    };
    Some(field)
}

/// Substitute every placeholder of `template` with values from `info`.
/// Empty delimiters mean the template has no placeholders.
pub fn render(
    template: &str,
    left: &str,
    right: &str,
    info: &SpecInfo,
) -> Result<String, RenderError> {
    if left.is_empty() || right.is_empty() {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(start) = rest.find(left) {
        out.push_str(&rest[..start]);

        let after_left = &rest[start + left.len()..];
        let end = after_left
            .find(right)
            .ok_or(RenderError::UnclosedAction {
                offset: consumed + start,
            })?;

        evaluate(after_left[..end].trim(), left, info, &mut out)?;

        let advance = start + left.len() + end + right.len();
        consumed += advance;
        rest = &rest[advance..];
    }

    out.push_str(rest);
    Ok(out)
}

fn evaluate(action: &str, left: &str, info: &SpecInfo, out: &mut String) -> Result<(), RenderError> {
    let unknown = || RenderError::UnknownAction {
        action: action.to_string(),
    };

    if action == "ldelim" {
        out.push_str(left);
        return Ok(());
    }

    let (marshal, target) = match action.split_once(char::is_whitespace) {
        Some(("marshal", target)) => (true, target.trim()),
        Some(("escape", target)) => (false, target.trim()),
        Some(_) => return Err(unknown()),
        None => (false, action),
    };

    let name = target.strip_prefix('.').ok_or_else(unknown)?;
    let field = lookup(info, name).ok_or_else(unknown)?;

    match (marshal, field) {
        (true, Field::Text(text)) => out.push_str(&serde_json::to_string(text)?),
        (true, Field::List(items)) => out.push_str(&serde_json::to_string(items)?),
        (false, Field::Text(text)) => out.push_str(&escape_json(text)?),
        (false, Field::List(_)) => return Err(unknown()),
    }
    Ok(())
}

/// JSON string escaping without the surrounding quotes.
fn escape_json(text: &str) -> Result<String, RenderError> {
    let quoted = serde_json::to_string(text)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> SpecInfo {
        SpecInfo {
            version: "2.1".into(),
            host: "localhost".into(),
            base_path: "/api".into(),
            schemes: vec!["http".into(), "https".into()],
            title: "Pets".into(),
            description: "Line one\nsays \"hi\"".into(),
            instance_name: "swagger".into(),
            template: String::new(),
            left_delim: "{{".into(),
            right_delim: "}}".into(),
        }
    }

    #[test]
    fn substitutes_fields() {
        let out = render(r#"{"v": "{{.Version}}", "b": "{{ .BasePath }}"}"#, "{{", "}}", &info()).unwrap();
        assert_eq!(out, r#"{"v": "2.1", "b": "/api"}"#);
    }

    #[test]
    fn escape_keeps_json_valid() {
        let out = render(r#"{"d": "{{escape .Description}}"}"#, "{{", "}}", &info()).unwrap();
        assert_eq!(out, r#"{"d": "Line one\nsays \"hi\""}"#);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["d"], "Line one\nsays \"hi\"");
    }

    #[test]
    fn marshal_schemes() {
        let out = render(r#"{"schemes": {{ marshal .Schemes }}}"#, "{{", "}}", &info()).unwrap();
        assert_eq!(out, r#"{"schemes": ["http","https"]}"#);
    }

    #[test]
    fn ldelim_restores_literal_delimiter() {
        let out = render(r#"{"x": "{{ldelim}} not a placeholder }}"}"#, "{{", "}}", &info()).unwrap();
        assert_eq!(out, r#"{"x": "{{ not a placeholder }}"}"#);
    }

    #[test]
    fn custom_delimiters() {
        let out = render(r#"{"t": "[[.Title]]", "k": "{{.Title}}"}"#, "[[", "]]", &info()).unwrap();
        assert_eq!(out, r#"{"t": "Pets", "k": "{{.Title}}"}"#);
    }

    #[test]
    fn unclosed_placeholder() {
        let err = render("abc {{.Title", "{{", "}}", &info()).unwrap_err();
        assert!(matches!(err, RenderError::UnclosedAction { offset: 4 }));
    }

    #[test]
    fn unknown_actions() {
        for action in ["{{.Nope}}", "{{Title}}", "{{range .Schemes}}", "{{.Schemes}}"] {
            let err = render(action, "{{", "}}", &info()).unwrap_err();
            assert!(matches!(err, RenderError::UnknownAction { .. }), "{action}");
        }
    }
}
