//! Convert serde_json::Value to values sqlx can bind.

use serde_json::Value;

/// A value bound to a PostgreSQL query. Built from JSON row values and filter operands.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
    Json(Value),
}

impl BindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else if let Some(f) = n.as_f64() {
                    BindValue::F64(f)
                } else {
                    BindValue::Text(n.to_string())
                }
            }
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::Json(v.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_keep_their_type() {
        assert_eq!(BindValue::from_json(&json!(true)), BindValue::Bool(true));
        assert_eq!(BindValue::from_json(&json!(3)), BindValue::I64(3));
        assert_eq!(BindValue::from_json(&json!(2.5)), BindValue::F64(2.5));
        assert_eq!(BindValue::from_json(&json!("a")), BindValue::Text("a".into()));
        assert_eq!(BindValue::from_json(&json!(["a"])), BindValue::Json(json!(["a"])));
    }
}
