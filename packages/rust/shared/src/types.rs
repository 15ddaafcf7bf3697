//! Core domain types: the API description document and its dialect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SpecgenError};

/// Tag value written by extractors for legacy documents.
pub const LEGACY_VERSION: &str = "2.0";

/// Tag value used for converted documents unless the legacy tag already
/// names a 3.x version.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Key holding the legacy dialect tag.
const LEGACY_TAG: &str = "swagger";

/// Key holding the current dialect tag.
const CURRENT_TAG: &str = "openapi";

// ---------------------------------------------------------------------------
// Dialect
// ---------------------------------------------------------------------------

/// The two structural conventions a document can be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Swagger 2.0: `definitions`, body parameters, `host` + `basePath`.
    #[default]
    Swagger2,
    /// OpenAPI 3.0: `components.schemas`, `requestBody`, `servers`.
    OpenApi3,
}

impl Dialect {
    /// The top-level key carrying this dialect's version tag.
    pub fn tag_key(self) -> &'static str {
        match self {
            Self::Swagger2 => LEGACY_TAG,
            Self::OpenApi3 => CURRENT_TAG,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Swagger2 => f.write_str("swagger2"),
            Self::OpenApi3 => f.write_str("openapi3"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = SpecgenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swagger2" | "swagger" | LEGACY_VERSION => Ok(Self::Swagger2),
            "openapi3" | "openapi" | "3.0" | "3.0.0" => Ok(Self::OpenApi3),
            other => Err(SpecgenError::config(format!("unknown dialect '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The full API description, held as an untyped JSON object tree.
///
/// Every transformation applied to a document works structurally on this
/// tree; no concrete schema types are involved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wrap a JSON value. Anything other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SpecgenError::extraction(format!(
                "document must be a JSON object, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Detect the dialect from the tag key. `None` when neither tag exists.
    pub fn dialect(&self) -> Option<Dialect> {
        if self.0.contains_key(LEGACY_TAG) {
            Some(Dialect::Swagger2)
        } else if self.0.contains_key(CURRENT_TAG) {
            Some(Dialect::OpenApi3)
        } else {
            None
        }
    }

    /// The version string under whichever dialect tag is present.
    pub fn version(&self) -> Option<&str> {
        self.0
            .get(LEGACY_TAG)
            .or_else(|| self.0.get(CURRENT_TAG))
            .and_then(Value::as_str)
    }

    /// True when a legacy-shaped document carries a 3.x tag, which is how
    /// extractors ask for current-dialect output.
    pub fn requests_openapi3(&self) -> bool {
        self.dialect() == Some(Dialect::Swagger2)
            && self.version().is_some_and(|v| v.starts_with('3'))
    }

    /// Read the metadata record used by generated sources.
    pub fn info(&self) -> DocInfo {
        let info = self.0.get("info");
        let info_str = |key: &str| {
            info.and_then(|i| i.get(key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let top_str = |key: &str| {
            self.0
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        DocInfo {
            version: info_str("version"),
            host: top_str("host"),
            base_path: top_str("basePath"),
            schemes: self
                .0
                .get("schemes")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            title: info_str("title"),
            description: info_str("description"),
        }
    }

    /// Pretty JSON with 4-space indentation and sorted keys.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// DocInfo
// ---------------------------------------------------------------------------

/// Metadata carried next to a generated document.
///
/// Captured before conversion: the current dialect has no `host` or
/// `basePath`, but the metadata record keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInfo {
    pub version: String,
    pub host: String,
    pub base_path: String,
    pub schemes: Vec<String>,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> Document {
        Document::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0", "description": "Pets <b>API</b>"},
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["https", "http"],
            "paths": {}
        }))
        .unwrap()
    }

    #[test]
    fn dialect_detection() {
        assert_eq!(petstore().dialect(), Some(Dialect::Swagger2));

        let current = Document::from_value(json!({"openapi": "3.0.0"})).unwrap();
        assert_eq!(current.dialect(), Some(Dialect::OpenApi3));
        assert_eq!(current.version(), Some("3.0.0"));

        assert_eq!(Document::default().dialect(), None);
    }

    #[test]
    fn legacy_tag_with_3x_version_requests_conversion() {
        assert!(!petstore().requests_openapi3());

        let doc = Document::from_value(json!({"swagger": "3.0.0"})).unwrap();
        assert!(doc.requests_openapi3());
    }

    #[test]
    fn info_is_read_from_document() {
        let info = petstore().info();
        assert_eq!(info.title, "Petstore");
        assert_eq!(info.version, "1.0");
        assert_eq!(info.host, "api.example.com");
        assert_eq!(info.base_path, "/v1");
        assert_eq!(info.schemes, vec!["https", "http"]);
        assert_eq!(info.description, "Pets <b>API</b>");
    }

    #[test]
    fn pretty_json_uses_four_spaces() {
        let out = String::from_utf8(petstore().to_json_pretty().unwrap()).unwrap();
        assert!(out.starts_with("{\n    \"basePath\": \"/v1\""));
        assert!(out.contains("\n        \"description\""));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let err = Document::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("got an array"));
    }

    #[test]
    fn dialect_parses_from_config_strings() {
        assert_eq!("openapi3".parse::<Dialect>().unwrap(), Dialect::OpenApi3);
        assert_eq!("Swagger2".parse::<Dialect>().unwrap(), Dialect::Swagger2);
        assert_eq!(LEGACY_VERSION.parse::<Dialect>().unwrap(), Dialect::Swagger2);
        assert!("soap".parse::<Dialect>().is_err());
    }
}
