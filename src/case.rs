//! Request key normalization: form clients post camelCase, rows use snake_case.

use serde_json::{Map, Value};

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "customerName" -> "customer_name", "unitPrice" -> "unit_price"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object from camelCase to snake_case (in place).
/// An existing snake_case key wins over its camelCase twin.
pub fn object_keys_to_snake_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let snake = to_snake_case(&k);
        if snake != k {
            if let Some(v) = obj.remove(&k) {
                obj.entry(snake).or_insert(v);
            }
        }
    }
}
