//! Request validation for form submissions. All failing fields are reported together.

use crate::case::object_keys_to_snake_case;
use crate::error::{AppError, FieldError};
use crate::store::value_text;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

pub const INQUIRY_TYPES: &[&str] = &["general", "quote", "support", "project"];

/// Constraints on one body field. Text is trimmed before checks.
#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub email: bool,
    pub allowed: Option<&'static [&'static str]>,
    pub integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Replaces the generated message for any failure of this field.
    pub message: Option<&'static str>,
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check every rule; returns all failures, empty when the body is valid.
    pub fn validate(body: &Map<String, Value>, rules: &[(&str, FieldRule)]) -> Vec<FieldError> {
        rules
            .iter()
            .filter_map(|(field, rule)| {
                check(field, body.get(*field), rule)
                    .err()
                    .map(|m| FieldError::new(*field, rule.message.map(str::to_string).unwrap_or(m)))
            })
            .collect()
    }
}

fn check(field: &str, v: Option<&Value>, rule: &FieldRule) -> Result<(), String> {
    let v = v.filter(|v| !v.is_null() && value_text(v).map(|s| !s.trim().is_empty()).unwrap_or(true));
    let Some(v) = v else {
        return if rule.required {
            Err(format!("{} is required", field))
        } else {
            Ok(())
        };
    };
    if rule.integer || rule.minimum.is_some() || rule.maximum.is_some() {
        let n = as_number(v).ok_or_else(|| format!("{} must be a number", field))?;
        if rule.integer && n.fract() != 0.0 {
            return Err(format!("{} must be a whole number", field));
        }
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(format!("{} must be at least {}", field, min));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(format!("{} must be at most {}", field, max));
            }
        }
        return Ok(());
    }
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        _ => return Err(format!("{} must be text", field)),
    };
    if let Some(min) = rule.min_length {
        if s.chars().count() < min {
            return Err(format!("{} must be at least {} characters", field, min));
        }
    }
    if let Some(max) = rule.max_length {
        if s.chars().count() > max {
            return Err(format!("{} must be at most {} characters", field, max));
        }
    }
    if rule.email && !is_valid_email(&s) {
        return Err("Invalid email address".to_string());
    }
    if let Some(allowed) = rule.allowed {
        if !allowed.contains(&s.as_str()) {
            return Err(format!("{} must be one of: {}", field, allowed.join(", ")));
        }
    }
    Ok(())
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

/// Lowercased, trimmed address used as the subscriber identity.
pub fn normalize_email(s: &str) -> String {
    s.trim().to_lowercase()
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(mut m) => {
            object_keys_to_snake_case(&mut m);
            Ok(m)
        }
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn required_text(body: &Map<String, Value>, key: &str) -> String {
    optional_text(body, key).unwrap_or_default()
}

fn optional_text(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key)
        .and_then(value_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validated(body: &Map<String, Value>, rules: &[(&str, FieldRule)]) -> Result<(), AppError> {
    let errors = RequestValidator::validate(body, rules);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    General,
    Quote,
    Support,
    Project,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl InquiryType {
    fn parse(s: Option<&str>) -> Self {
        match s {
            Some("quote") => InquiryType::Quote,
            Some("support") => InquiryType::Support,
            Some("project") => InquiryType::Project,
            _ => InquiryType::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Quote => "quote",
            InquiryType::Support => "support",
            InquiryType::Project => "project",
        }
    }

    /// Sales-relevant inquiries jump the queue.
    pub fn priority(self) -> Priority {
        match self {
            InquiryType::Quote | InquiryType::Project => Priority::High,
            InquiryType::General | InquiryType::Support => Priority::Medium,
        }
    }
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
}

impl InquiryRequest {
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let body = body_to_map(body)?;
        validated(
            &body,
            &[
                ("name", FieldRule { required: true, min_length: Some(2), max_length: Some(100), ..Default::default() }),
                ("email", FieldRule { required: true, email: true, ..Default::default() }),
                ("phone", FieldRule { max_length: Some(30), ..Default::default() }),
                ("subject", FieldRule { required: true, min_length: Some(3), max_length: Some(200), ..Default::default() }),
                ("message", FieldRule { required: true, min_length: Some(1), max_length: Some(5000), ..Default::default() }),
                ("type", FieldRule { allowed: Some(INQUIRY_TYPES), ..Default::default() }),
            ],
        )?;
        Ok(InquiryRequest {
            name: required_text(&body, "name"),
            email: required_text(&body, "email"),
            phone: optional_text(&body, "phone"),
            subject: required_text(&body, "subject"),
            message: required_text(&body, "message"),
            inquiry_type: InquiryType::parse(optional_text(&body, "type").as_deref()),
        })
    }
}

pub const DEFAULT_CURRENCY: &str = "KES";
/// Largest quantity a single order line accepts.
pub const MAX_QUANTITY: f64 = u32::MAX as f64;

#[derive(Clone, Debug, PartialEq)]
pub struct OrderRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub product_id: Option<String>,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub currency: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

impl OrderRequest {
    /// Accepts snake_case or camelCase keys. A missing total is unit price times quantity.
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let body = body_to_map(body)?;
        validated(
            &body,
            &[
                ("customer_name", FieldRule { required: true, min_length: Some(2), max_length: Some(100), ..Default::default() }),
                ("email", FieldRule { required: true, email: true, ..Default::default() }),
                ("product_name", FieldRule { required: true, min_length: Some(1), ..Default::default() }),
                ("quantity", FieldRule { required: true, integer: true, minimum: Some(1.0), maximum: Some(MAX_QUANTITY), ..Default::default() }),
                ("unit_price", FieldRule { required: true, minimum: Some(0.0), ..Default::default() }),
                ("total_price", FieldRule { minimum: Some(0.0), ..Default::default() }),
                ("currency", FieldRule { min_length: Some(3), max_length: Some(3), ..Default::default() }),
            ],
        )?;
        let quantity = body.get("quantity").and_then(as_number).unwrap_or(1.0) as u32;
        let unit_price = body.get("unit_price").and_then(as_number).unwrap_or(0.0);
        let total_price = body
            .get("total_price")
            .and_then(as_number)
            .unwrap_or(unit_price * f64::from(quantity));
        Ok(OrderRequest {
            customer_name: required_text(&body, "customer_name"),
            email: required_text(&body, "email"),
            phone: optional_text(&body, "phone"),
            product_id: optional_text(&body, "product_id"),
            product_name: required_text(&body, "product_name"),
            quantity,
            unit_price,
            total_price,
            currency: optional_text(&body, "currency")
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            delivery_address: optional_text(&body, "delivery_address"),
            notes: optional_text(&body, "notes"),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewsletterRequest {
    /// Normalized (trimmed, lowercase).
    pub email: String,
}

impl NewsletterRequest {
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let body = body_to_map(body)?;
        validated(&body, &[("email", FieldRule { required: true, email: true, ..Default::default() })])?;
        Ok(NewsletterRequest {
            email: normalize_email(&required_text(&body, "email")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errs) => errs.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn priority_follows_type() {
        assert_eq!(InquiryType::Quote.priority(), Priority::High);
        assert_eq!(InquiryType::Project.priority(), Priority::High);
        assert_eq!(InquiryType::General.priority(), Priority::Medium);
        assert_eq!(InquiryType::Support.priority(), Priority::Medium);
    }

    #[test]
    fn inquiry_defaults_to_general() {
        let req = InquiryRequest::parse(json!({
            "name": "Wanjiru", "email": "wanjiru@studio.test", "subject": "Kitchen", "message": "Hello"
        }))
        .unwrap();
        assert_eq!(req.inquiry_type, InquiryType::General);
        assert_eq!(req.phone, None);
    }

    #[test]
    fn inquiry_reports_every_bad_field() {
        let err = InquiryRequest::parse(json!({
            "name": "A", "email": "not-an-email", "subject": "Hi", "message": "  ", "type": "spam"
        }))
        .unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "subject", "message", "type"]);
    }

    #[test]
    fn order_accepts_camel_case_and_defaults() {
        let req = OrderRequest::parse(json!({
            "customerName": "Otieno", "email": "otieno@studio.test", "productName": "Marble Tile",
            "quantity": 3, "unitPrice": 1500
        }))
        .unwrap();
        assert_eq!(req.customer_name, "Otieno");
        assert_eq!(req.quantity, 3);
        assert_eq!(req.total_price, 4500.0);
        assert_eq!(req.currency, "KES");
    }

    #[test]
    fn order_rejects_bad_numbers() {
        let err = OrderRequest::parse(json!({
            "customer_name": "Otieno", "email": "otieno@studio.test", "product_name": "Tile",
            "quantity": 1.5, "unit_price": -1, "total_price": "abc"
        }))
        .unwrap_err();
        assert_eq!(fields(err), vec!["quantity", "unit_price", "total_price"]);
    }

    #[test]
    fn order_quantity_must_fit() {
        let body = |quantity: Value| {
            json!({
                "customer_name": "Otieno", "email": "otieno@studio.test", "product_name": "Tile",
                "quantity": quantity, "unit_price": 1
            })
        };
        let err = OrderRequest::parse(body(json!(5_000_000_000u64))).unwrap_err();
        assert_eq!(fields(err), vec!["quantity"]);
        let req = OrderRequest::parse(body(json!(u32::MAX))).unwrap();
        assert_eq!(req.quantity, u32::MAX);
    }

    #[test]
    fn newsletter_email_is_normalized() {
        let req = NewsletterRequest::parse(json!({"email": "  Ann@Studio.TEST "})).unwrap();
        assert_eq!(req.email, "ann@studio.test");
    }

    #[test]
    fn non_object_body_is_bad_request() {
        assert!(matches!(NewsletterRequest::parse(json!(["x"])), Err(AppError::BadRequest(_))));
    }
}
