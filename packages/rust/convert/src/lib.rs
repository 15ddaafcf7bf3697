//! Swagger 2.0 → OpenAPI 3.0 dialect conversion.
//!
//! [`convert`] rewrites a legacy document in place. The steps run in a fixed
//! order; the reference rewrite runs last so it also reaches everything the
//! earlier steps relocated.
//!
//! 1. rename the dialect tag
//! 2. synthesize `servers` from `host` + `basePath`
//! 3. move `definitions`, `parameters`, `responses` and `securityDefinitions`
//!    under `components`
//! 4. turn body parameters into request bodies
//! 5. nest parameter type constraints under `schema`
//! 6. turn response schemas into `content` maps
//! 7. drop the document-level media type lists
//! 8. rewrite `$ref` pointers

mod components;
mod operation;
mod refs;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use specgen_shared::{Dialect, Document, OPENAPI_VERSION, Result, SpecgenError};

pub use refs::{
    CURRENT_SCHEMA_PREFIX, LEGACY_SCHEMA_PREFIX, rewrite_reference, rewrite_references,
};

type Object = Map<String, Value>;

/// Media type assumed when neither the operation nor the document declares one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Convert a Swagger 2.0 document into OpenAPI 3.0, in place.
///
/// Refuses documents that do not carry the legacy `swagger` tag; a converted
/// document no longer does, so a second call on the same document fails
/// instead of corrupting it.
#[instrument(skip_all, fields(version = doc.version().unwrap_or_default()))]
pub fn convert(doc: &mut Document) -> Result<()> {
    if doc.dialect() != Some(Dialect::Swagger2) {
        return Err(SpecgenError::conversion(
            "document is not in the swagger 2.0 dialect",
        ));
    }

    let map = doc.as_map_mut();

    rename_tag(map);
    synthesize_servers(map)?;

    let global_consumes = media_types(map.get("consumes"), "consumes")?;
    let global_produces = media_types(map.get("produces"), "produces")?;

    components::relocate(map, &global_produces)?;
    operation::convert_paths(map, &global_consumes, &global_produces)?;

    map.remove("consumes");
    map.remove("produces");

    let rewritten: usize = map.values_mut().map(rewrite_references).sum();

    debug!(references = rewritten, "dialect conversion complete");
    Ok(())
}

/// Replace the `swagger` tag by `openapi`, keeping a 3.x value the extractor
/// already asked for.
fn rename_tag(map: &mut Object) {
    let version = match map.remove(Dialect::Swagger2.tag_key()) {
        Some(Value::String(v)) if v.starts_with('3') => v,
        _ => OPENAPI_VERSION.to_string(),
    };
    map.insert(Dialect::OpenApi3.tag_key().into(), Value::String(version));
}

/// Build `servers` from `host` and `basePath`, then drop both along with
/// `schemes`, which has no place in the current dialect.
///
/// The scheme list is not consulted: servers are always `http://`.
fn synthesize_servers(map: &mut Object) -> Result<()> {
    let host = take_string(map, "host")?;
    let base_path = take_string(map, "basePath")?;
    map.remove("schemes");

    let url = match (host, base_path) {
        (Some(host), Some(base_path)) => format!("http://{host}{base_path}"),
        (Some(host), None) => format!("http://{host}"),
        (None, Some(base_path)) => base_path,
        (None, None) => return Ok(()),
    };

    let mut server = Object::new();
    server.insert("url".into(), Value::String(url));
    map.insert("servers".into(), Value::Array(vec![Value::Object(server)]));
    Ok(())
}

/// Remove a string field; empty strings count as absent.
fn take_string(map: &mut Object, key: &str) -> Result<Option<String>> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(SpecgenError::conversion(format!("`{key}` must be a string"))),
    }
}

/// Read a media type list (`consumes` / `produces`).
fn media_types(value: Option<&Value>, what: &str) -> Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SpecgenError::conversion(format!("`{what}` must only contain strings"))
                })
            })
            .collect(),
        Some(_) => Err(SpecgenError::conversion(format!("`{what}` must be an array"))),
    }
}

/// Borrow a value as an object or fail with a message naming its location.
fn expect_object<'a>(value: &'a mut Value, location: &str) -> Result<&'a mut Object> {
    value
        .as_object_mut()
        .ok_or_else(|| SpecgenError::conversion(format!("{location} must be an object")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn servers_from_host_and_base_path() {
        let mut d = doc(json!({
            "swagger": "2.0",
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "paths": {}
        }));
        convert(&mut d).unwrap();

        let map = d.as_map();
        assert_eq!(map["servers"], json!([{"url": "http://api.example.com/v1"}]));
        assert!(!map.contains_key("host"));
        assert!(!map.contains_key("basePath"));
        assert!(!map.contains_key("schemes"));
        assert_eq!(map["openapi"], "3.0.0");
        assert!(!map.contains_key("swagger"));
    }

    #[test]
    fn servers_from_host_only() {
        let mut d = doc(json!({"swagger": "2.0", "host": "localhost:8080"}));
        convert(&mut d).unwrap();
        assert_eq!(d.as_map()["servers"], json!([{"url": "http://localhost:8080"}]));
    }

    #[test]
    fn relative_server_from_base_path_only() {
        let mut d = doc(json!({"swagger": "2.0", "basePath": "/api"}));
        convert(&mut d).unwrap();
        assert_eq!(d.as_map()["servers"], json!([{"url": "/api"}]));
    }

    #[test]
    fn no_servers_without_host_or_base_path() {
        let mut d = doc(json!({"swagger": "2.0", "host": ""}));
        convert(&mut d).unwrap();
        assert!(!d.as_map().contains_key("servers"));
    }

    #[test]
    fn requested_3x_version_is_kept() {
        let mut d = doc(json!({"swagger": "3.0.3"}));
        convert(&mut d).unwrap();
        assert_eq!(d.as_map()["openapi"], "3.0.3");
    }

    #[test]
    fn second_conversion_is_refused() {
        let mut d = doc(json!({"swagger": "2.0", "paths": {}}));
        convert(&mut d).unwrap();
        let before = d.clone();

        let err = convert(&mut d).unwrap_err();
        assert!(matches!(err, SpecgenError::Conversion { .. }));
        assert_eq!(d, before);
    }

    #[test]
    fn global_media_types_are_removed() {
        let mut d = doc(json!({
            "swagger": "2.0",
            "consumes": ["application/json"],
            "produces": ["application/json"]
        }));
        convert(&mut d).unwrap();
        assert!(!d.as_map().contains_key("consumes"));
        assert!(!d.as_map().contains_key("produces"));
    }

    #[test]
    fn malformed_host_is_a_conversion_error() {
        let mut d = doc(json!({"swagger": "2.0", "host": 42}));
        let err = convert(&mut d).unwrap_err();
        assert!(err.to_string().contains("`host` must be a string"));
    }

    #[test]
    fn malformed_media_types_are_conversion_errors() {
        let mut d = doc(json!({"swagger": "2.0", "consumes": "application/json"}));
        assert!(convert(&mut d).is_err());

        let mut d = doc(json!({"swagger": "2.0", "produces": [1]}));
        assert!(convert(&mut d).is_err());
    }

    #[test]
    fn petstore_fixture_converts_completely() {
        let content = std::fs::read_to_string("../../../fixtures/petstore/swagger.json")
            .expect("read fixture");
        let mut d = Document::from_json(&content).unwrap();
        convert(&mut d).unwrap();

        let out = String::from_utf8(d.to_json().unwrap()).unwrap();
        assert!(!out.contains(LEGACY_SCHEMA_PREFIX));
        assert!(out.contains("#/components/schemas/Pet"));

        let map = d.as_map();
        assert!(map["components"]["schemas"]["Pet"].is_object());
        let post = &map["paths"]["/pets"]["post"];
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Pet"
        );
        assert!(post.get("parameters").is_none());
    }
}
