//! `$ref` pointer rewriting.

use serde_json::Value;

/// Prefix of schema references in the legacy dialect.
pub const LEGACY_SCHEMA_PREFIX: &str = "#/definitions/";

/// Prefix of schema references in the current dialect.
pub const CURRENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Legacy → current pointer prefixes. Named parameters and responses move
/// under `components` alongside schemas.
const PREFIXES: [(&str, &str); 3] = [
    (LEGACY_SCHEMA_PREFIX, CURRENT_SCHEMA_PREFIX),
    ("#/parameters/", "#/components/parameters/"),
    ("#/responses/", "#/components/responses/"),
];

/// Map a single legacy pointer to its current form. `None` when the pointer
/// does not use a legacy prefix.
pub fn rewrite_reference(reference: &str) -> Option<String> {
    PREFIXES.iter().find_map(|(legacy, current)| {
        reference
            .strip_prefix(legacy)
            .map(|name| format!("{current}{name}"))
    })
}

/// Rewrite every `$ref` string in the tree, at any depth. Returns how many
/// pointers changed.
pub fn rewrite_references(value: &mut Value) -> usize {
    match value {
        Value::Object(map) => {
            let mut count = 0;
            for (key, child) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(reference) = child {
                        if let Some(rewritten) = rewrite_reference(reference) {
                            *reference = rewritten;
                            count += 1;
                        }
                        continue;
                    }
                }
                count += rewrite_references(child);
            }
            count
        }
        Value::Array(items) => items.iter_mut().map(rewrite_references).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rewrites_at_every_depth() {
        let mut tree = json!({
            "schema": {"$ref": "#/definitions/Pet"},
            "items": {"type": "array", "items": {"$ref": "#/definitions/Pet"}},
            "responses": {
                "200": {"content": {"application/json": {"schema": {
                    "allOf": [{"$ref": "#/definitions/Pet"}, {"type": "object"}]
                }}}}
            },
            "nested": [[{"$ref": "#/definitions/Pet"}]]
        });

        assert_eq!(rewrite_references(&mut tree), 4);

        let text = tree.to_string();
        assert!(!text.contains(LEGACY_SCHEMA_PREFIX));
        assert_eq!(text.matches("#/components/schemas/Pet").count(), 4);
    }

    #[test]
    fn other_strings_are_untouched() {
        let mut tree = json!({
            "description": "see #/definitions/Pet",
            "example": "#/definitions/Pet",
            "$ref": "https://example.com/schemas/pet.json"
        });
        let before = tree.clone();
        assert_eq!(rewrite_references(&mut tree), 0);
        assert_eq!(tree, before);
    }

    #[test]
    fn property_named_ref_is_walked_not_rewritten() {
        let mut tree = json!({"properties": {"$ref": {"items": {"$ref": "#/definitions/Tag"}}}});
        assert_eq!(rewrite_references(&mut tree), 1);
        assert_eq!(
            tree["properties"]["$ref"]["items"]["$ref"],
            "#/components/schemas/Tag"
        );
    }

    #[test]
    fn parameter_and_response_pointers_move_under_components() {
        assert_eq!(
            rewrite_reference("#/parameters/limit").as_deref(),
            Some("#/components/parameters/limit")
        );
        assert_eq!(
            rewrite_reference("#/responses/NotFound").as_deref(),
            Some("#/components/responses/NotFound")
        );
        assert_eq!(rewrite_reference("#/components/schemas/Pet"), None);
    }
}
