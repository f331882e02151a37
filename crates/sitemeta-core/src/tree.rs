//! Metadata tree and dotted-key placement

use serde_json::{Map, Value};

/// The merged metadata handed to templates
pub type Metadata = Map<String, Value>;

/// Put `value` into `tree` at `key`.
///
/// A key without dots replaces whatever was there. A dotted key walks (and
/// creates) intermediate objects, then merges into the leaf: when both the
/// existing leaf and `value` are objects their keys are unioned with `value`
/// winning; otherwise `value` replaces the leaf. Siblings along the path are
/// never touched, so `nav.primary` and `nav.footer` can both fill `nav`.
pub fn place(tree: &mut Metadata, key: &str, value: Value) {
    let Some((parents, leaf)) = key.rsplit_once('.') else {
        tree.insert(key.to_string(), value);
        return;
    };

    let mut node = tree;
    for segment in parents.split('.') {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            tracing::warn!(
                "Replacing non-object value at '{}' while placing '{}'",
                segment,
                key
            );
            *entry = Value::Object(Map::new());
        }
        let Some(map) = entry.as_object_mut() else {
            return;
        };
        node = map;
    }

    let replacement = match (node.get_mut(leaf), value) {
        (Some(Value::Object(existing)), Value::Object(incoming)) => {
            existing.extend(incoming);
            None
        }
        (_, value) => Some(value),
    };
    if let Some(value) = replacement {
        node.insert(leaf.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_plain_key_replaces() {
        let mut metadata = tree(json!({"site": {"title": "Old", "lang": "en"}}));
        place(&mut metadata, "site", json!({"title": "New"}));
        assert_eq!(Value::Object(metadata), json!({"site": {"title": "New"}}));
    }

    #[test]
    fn test_dotted_key_creates_parents() {
        let mut metadata = Metadata::new();
        place(&mut metadata, "a.b.c", json!([1, 2]));
        assert_eq!(Value::Object(metadata), json!({"a": {"b": {"c": [1, 2]}}}));
    }

    #[test]
    fn test_dotted_siblings_preserved() {
        let mut metadata = Metadata::new();
        place(&mut metadata, "nav.primary", json!(["home"]));
        place(&mut metadata, "nav.footer", json!(["legal"]));
        assert_eq!(
            Value::Object(metadata),
            json!({"nav": {"primary": ["home"], "footer": ["legal"]}})
        );
    }

    #[test]
    fn test_dotted_leaf_merges_objects() {
        let mut metadata = tree(json!({"a": {"b": {"x": 1, "y": 2}}}));
        place(&mut metadata, "a.b", json!({"y": 3, "z": 4}));
        assert_eq!(
            Value::Object(metadata),
            json!({"a": {"b": {"x": 1, "y": 3, "z": 4}}})
        );
    }

    #[test]
    fn test_dotted_leaf_non_object_replaces() {
        let mut metadata = tree(json!({"a": {"b": {"x": 1}}}));
        place(&mut metadata, "a.b", json!(["list"]));
        assert_eq!(Value::Object(metadata), json!({"a": {"b": ["list"]}}));
    }

    #[test]
    fn test_non_object_parent_replaced() {
        let mut metadata = tree(json!({"a": "scalar", "keep": true}));
        place(&mut metadata, "a.b", json!(1));
        assert_eq!(Value::Object(metadata), json!({"a": {"b": 1}, "keep": true}));
    }

    #[test]
    fn test_deep_non_object_parent_replaced() {
        let mut metadata = tree(json!({"a": {"b": [1, 2], "c": 3}}));
        place(&mut metadata, "a.b.d.e", json!("leaf"));
        assert_eq!(
            Value::Object(metadata),
            json!({"a": {"b": {"d": {"e": "leaf"}}, "c": 3}})
        );
    }
}
