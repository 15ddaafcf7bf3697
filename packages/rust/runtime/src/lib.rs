//! Runtime side of generated documentation sources.
//!
//! A generated `docs.rs` unit exposes a [`SpecInfo`] and a `register`
//! function that inserts it into a [`Registry`] owned by the host
//! application. The registry is an ordinary value: hosts that load
//! documents from several threads wrap it in a lock themselves.

mod template;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use template::render;

/// Errors raised while looking up or rendering a registered document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A placeholder was opened but never closed.
    #[error("unclosed placeholder starting at byte {offset}")]
    UnclosedAction { offset: usize },

    /// A placeholder named something the renderer does not know.
    #[error("unknown placeholder '{action}'")]
    UnknownAction { action: String },

    /// No document is registered under the requested instance name.
    #[error("no document registered for instance '{name}'")]
    UnknownInstance { name: String },

    /// A field could not be encoded as JSON.
    #[error("cannot encode placeholder value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Metadata record and document template of one generated document.
///
/// The metadata fields are public so hosts can adjust them (for example the
/// host name of the deployment) before reading the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInfo {
    pub version: String,
    pub host: String,
    pub base_path: String,
    pub schemes: Vec<String>,
    pub title: String,
    pub description: String,
    pub instance_name: String,
    /// Document text with placeholders for the metadata fields.
    pub template: String,
    pub left_delim: String,
    pub right_delim: String,
}

impl SpecInfo {
    /// Render the document with the current metadata values.
    pub fn read_doc(&self) -> Result<String, RenderError> {
        render(&self.template, &self.left_delim, &self.right_delim, self)
    }
}

/// Registry of generated documents keyed by instance name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    docs: BTreeMap<String, SpecInfo>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under its instance name, returning the one it
    /// replaced.
    pub fn register(&mut self, info: SpecInfo) -> Option<SpecInfo> {
        let name = info.instance_name.clone();
        let previous = self.docs.insert(name.clone(), info);
        debug!(instance = %name, replaced = previous.is_some(), "registered document");
        previous
    }

    pub fn get(&self, name: &str) -> Option<&SpecInfo> {
        self.docs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SpecInfo> {
        self.docs.get_mut(name)
    }

    /// Render the document registered under `name`.
    pub fn read_doc(&self, name: &str) -> Result<String, RenderError> {
        self.get(name)
            .ok_or_else(|| RenderError::UnknownInstance {
                name: name.to_string(),
            })?
            .read_doc()
    }

    /// Registered instance names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> SpecInfo {
        SpecInfo {
            version: "1.0".into(),
            host: "localhost:8080".into(),
            base_path: "/v1".into(),
            schemes: vec!["http".into()],
            title: "Petstore".into(),
            description: "All the pets".into(),
            instance_name: name.into(),
            template: r#"{"info": {"title": "{{.Title}}"}, "host": "{{.Host}}"}"#.into(),
            left_delim: "{{".into(),
            right_delim: "}}".into(),
        }
    }

    #[test]
    fn register_and_read() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.register(info("swagger")).is_none());

        let doc = registry.read_doc("swagger").unwrap();
        assert_eq!(doc, r#"{"info": {"title": "Petstore"}, "host": "localhost:8080"}"#);
    }

    #[test]
    fn register_replaces_previous_document() {
        let mut registry = Registry::new();
        registry.register(info("billing"));
        let mut newer = info("billing");
        newer.version = "2.0".into();

        let previous = registry.register(newer).unwrap();
        assert_eq!(previous.version, "1.0");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("billing").unwrap().version, "2.0");
    }

    #[test]
    fn metadata_changes_show_up_in_rendered_doc() {
        let mut registry = Registry::new();
        registry.register(info("swagger"));
        registry.get_mut("swagger").unwrap().host = "api.example.com".into();

        let doc = registry.read_doc("swagger").unwrap();
        assert!(doc.contains(r#""host": "api.example.com""#));
    }

    #[test]
    fn unknown_instance_is_an_error() {
        let registry = Registry::new();
        let err = registry.read_doc("missing").unwrap_err();
        assert!(matches!(err, RenderError::UnknownInstance { .. }));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = Registry::new();
        registry.register(info("swagger"));
        registry.register(info("billing"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["billing", "swagger"]);
    }
}
