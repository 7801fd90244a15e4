//! Structural hashing of navigation trees.
//!
//! Trees are rebuilt freely by callers, so memo keys are derived from
//! content: object keys are sorted, array order is kept, predicates are
//! left out, and the resulting string goes through a djb2 hash.

use serde_json::Value;

use crate::navigation::item::NavigationItem;

// == Stable Stringify ==
/// Serializes a JSON value with object keys in sorted order.
pub fn stable_stringify(value: &Value) -> String {
    let mut out = String::new();
    write_stable(value, &mut out);
    out
}

fn write_stable(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (index, key) in keys.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(field) = map.get(key) {
                    write_stable(field, out);
                }
            }
            out.push('}');
        }
        Value::Array(elements) => {
            out.push('[');
            for (index, element) in elements.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_stable(element, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

// == DJB2 ==
/// djb2 string hash (`hash * 33 + c`), wrapping at 32 bits.
pub fn djb2(input: &str) -> u32 {
    input.chars().fold(5381u32, |hash, c| {
        (hash << 5).wrapping_add(hash).wrapping_add(c as u32)
    })
}

/// Content hash of an entire navigation tree.
pub fn structural_hash(items: &[NavigationItem]) -> u32 {
    let value = serde_json::to_value(items).unwrap_or_default();
    djb2(&stable_stringify(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stable_stringify_sorts_keys() {
        let a = json!({ "url": "/a", "title": "A", "nested": { "z": 1, "b": [3, 1] } });
        assert_eq!(
            stable_stringify(&a),
            r#"{"nested":{"b":[3,1],"z":1},"title":"A","url":"/a"}"#
        );
    }

    #[test]
    fn test_stable_stringify_escapes_strings() {
        let value = json!({ "title": "Say \"hi\"" });
        assert_eq!(stable_stringify(&value), r#"{"title":"Say \"hi\""}"#);
    }

    #[test]
    fn test_array_order_matters() {
        assert_ne!(
            stable_stringify(&json!([1, 2])),
            stable_stringify(&json!([2, 1]))
        );
    }

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("a"), 5381 * 33 + 97);
    }

    #[test]
    fn test_structural_hash_ignores_identity_and_predicates() {
        let build = || {
            vec![NavigationItem::new("Admin")
                .with_access(|| Ok(true))
                .with_items(vec![NavigationItem::new("Users").with_url("/admin/users")])]
        };
        assert_eq!(structural_hash(&build()), structural_hash(&build()));
    }

    #[test]
    fn test_structural_hash_sees_deep_changes() {
        let before = vec![NavigationItem::new("Admin")
            .with_items(vec![NavigationItem::new("Users").with_url("/admin/users")])];
        let after = vec![NavigationItem::new("Admin")
            .with_items(vec![NavigationItem::new("Users").with_url("/admin/people")])];
        assert_ne!(structural_hash(&before), structural_hash(&after));
    }
}
