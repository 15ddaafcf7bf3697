//! Per-operation conversion: request bodies, parameters, responses.

use serde_json::Value;
use tracing::warn;

use specgen_shared::{Result, SpecgenError};

use crate::{DEFAULT_MEDIA_TYPE, Object, expect_object, media_types};

/// HTTP methods a path item may hold operations under.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parameter fields that the current dialect nests under `schema`.
const TYPE_FIELDS: [&str; 11] = [
    "type",
    "format",
    "enum",
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "pattern",
    "items",
    "default",
    "example",
];

/// Convert every operation of every path item.
pub(crate) fn convert_paths(
    map: &mut Object,
    global_consumes: &[String],
    global_produces: &[String],
) -> Result<()> {
    let Some(paths) = map.get_mut("paths") else {
        return Ok(());
    };

    for (path, item) in expect_object(paths, "`paths`")?.iter_mut() {
        if path.starts_with("x-") {
            continue;
        }
        let item = expect_object(item, &format!("path item `{path}`"))?;

        if let Some(shared) = item.get_mut("parameters") {
            for param in parameter_list(shared, path)? {
                convert_parameter(expect_object(param, "parameter")?);
            }
        }

        for method in METHODS {
            if let Some(op) = item.get_mut(method) {
                let op = expect_object(op, &format!("operation `{method} {path}`"))?;
                convert_operation(op, path, global_consumes, global_produces)?;
            }
        }
    }

    Ok(())
}

fn convert_operation(
    op: &mut Object,
    path: &str,
    global_consumes: &[String],
    global_produces: &[String],
) -> Result<()> {
    let consumes = media_types(op.remove("consumes").as_ref(), "consumes")?;
    let produces = media_types(op.remove("produces").as_ref(), "produces")?;
    let consumes = pick_media_types(consumes, global_consumes);
    let produces = pick_media_types(produces, global_produces);

    if let Some(mut params) = op.remove("parameters") {
        let mut kept = Vec::new();
        let mut body = None;
        let mut form_fields = 0;

        for param in parameter_list(&mut params, path)?.drain(..) {
            let Value::Object(mut obj) = param else {
                return Err(SpecgenError::conversion(format!(
                    "parameter of `{path}` must be an object"
                )));
            };
            match location(&obj) {
                Some("body") => {
                    if body.is_none() {
                        body = Some(obj);
                    }
                }
                Some("formData") => {
                    form_fields += 1;
                    kept.push(Value::Object(obj));
                }
                _ => {
                    convert_parameter(&mut obj);
                    kept.push(Value::Object(obj));
                }
            }
        }

        if form_fields > 0 {
            warn!(path, form_fields, "formData parameters are left in the swagger 2.0 form");
        }
        if let Some(body) = body {
            op.insert("requestBody".into(), request_body(&body, &consumes));
        }
        if !kept.is_empty() {
            op.insert("parameters".into(), Value::Array(kept));
        }
    }

    if let Some(responses) = op.get_mut("responses") {
        let responses = expect_object(responses, &format!("responses of `{path}`"))?;
        for (code, response) in responses.iter_mut() {
            if code.starts_with("x-") {
                continue;
            }
            convert_response(
                expect_object(response, &format!("response `{code}` of `{path}`"))?,
                &produces,
            )?;
        }
    }

    Ok(())
}

/// Operation-level media types win, then document-level ones, then JSON.
fn pick_media_types(own: Vec<String>, global: &[String]) -> Vec<String> {
    if !own.is_empty() {
        own
    } else if !global.is_empty() {
        global.to_vec()
    } else {
        vec![DEFAULT_MEDIA_TYPE.to_string()]
    }
}

fn parameter_list<'a>(value: &'a mut Value, path: &str) -> Result<&'a mut Vec<Value>> {
    value.as_array_mut().ok_or_else(|| {
        SpecgenError::conversion(format!("parameters of `{path}` must be an array"))
    })
}

fn location(param: &Object) -> Option<&str> {
    param.get("in").and_then(Value::as_str)
}

/// Build a request body carrying the body parameter's schema under every
/// consumed media type.
fn request_body(param: &Object, consumes: &[String]) -> Value {
    let schema = param
        .get("schema")
        .cloned()
        .unwrap_or_else(|| Value::Object(Object::new()));

    let mut content = Object::new();
    for media_type in consumes {
        let mut entry = Object::new();
        entry.insert("schema".into(), schema.clone());
        content.insert(media_type.clone(), Value::Object(entry));
    }

    let mut body = Object::new();
    for key in ["description", "required"] {
        if let Some(value) = param.get(key) {
            body.insert(key.into(), value.clone());
        }
    }
    body.insert("content".into(), Value::Object(content));
    Value::Object(body)
}

/// Nest type constraints under `schema` and force `required` on path
/// parameters. Body and formData parameters are left alone.
pub(crate) fn convert_parameter(param: &mut Object) {
    let located_in = location(param).map(str::to_string);
    if matches!(located_in.as_deref(), Some("body" | "formData")) {
        return;
    }

    relocate_type_fields(param);
    if let Some(format) = param.remove("collectionFormat") {
        apply_collection_format(param, format.as_str(), located_in.as_deref());
    }

    if located_in.as_deref() == Some("path") {
        param.insert("required".into(), Value::Bool(true));
    }
}

/// Move [`TYPE_FIELDS`] into the `schema` object, creating it only when at
/// least one field moved.
fn relocate_type_fields(target: &mut Object) {
    let mut schema = match target.remove("schema") {
        Some(Value::Object(existing)) => existing,
        Some(other) => {
            target.insert("schema".into(), other);
            return;
        }
        None => Object::new(),
    };

    for field in TYPE_FIELDS {
        if let Some(value) = target.remove(field) {
            schema.insert(field.into(), value);
        }
    }

    if !schema.is_empty() {
        target.insert("schema".into(), Value::Object(schema));
    }
}

/// Translate `collectionFormat` into `style` / `explode`. Formats without a
/// current-dialect equivalent are dropped.
fn apply_collection_format(param: &mut Object, format: Option<&str>, location: Option<&str>) {
    let (style, explode) = match format {
        Some("csv") if matches!(location, Some("path" | "header")) => ("simple", false),
        Some("csv") => ("form", false),
        Some("multi") => ("form", true),
        Some("ssv") => ("spaceDelimited", false),
        Some("pipes") => ("pipeDelimited", false),
        _ => return,
    };
    param.insert("style".into(), Value::String(style.into()));
    param.insert("explode".into(), Value::Bool(explode));
}

/// Wrap a response schema in a `content` map keyed by produced media type.
pub(crate) fn convert_response(response: &mut Object, produces: &[String]) -> Result<()> {
    let examples = match response.remove("examples") {
        Some(Value::Object(examples)) => examples,
        None => Object::new(),
        Some(_) => {
            return Err(SpecgenError::conversion(
                "response `examples` must be an object",
            ));
        }
    };
    let schema = response.remove("schema");

    if schema.is_some() || !examples.is_empty() {
        let mut content = Object::new();
        let media_types = if schema.is_some() {
            produces.to_vec()
        } else {
            examples.keys().cloned().collect()
        };

        for media_type in media_types {
            let mut entry = Object::new();
            if let Some(schema) = &schema {
                entry.insert("schema".into(), schema.clone());
            }
            if let Some(example) = examples.get(&media_type) {
                entry.insert("example".into(), example.clone());
            }
            content.insert(media_type, Value::Object(entry));
        }
        response.insert("content".into(), Value::Object(content));
    }

    if let Some(headers) = response.get_mut("headers") {
        for (name, header) in expect_object(headers, "response `headers`")?.iter_mut() {
            relocate_type_fields(expect_object(header, &format!("header `{name}`"))?);
        }
    }

    Ok(())
}
