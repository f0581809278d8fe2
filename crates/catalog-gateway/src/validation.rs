//! Product payload validation.
//!
//! Validation runs as a route guard, after authentication and before the
//! handler. The first failing rule produces the single reported reason.

use serde_json::{Map, Value};

use crate::error::ApiError;

const TEXT_FIELDS: [&str; 3] = ["name", "description", "category"];

/// Fields a new product must carry, in reporting order.
const REQUIRED_FIELDS: [&str; 5] = ["name", "description", "price", "category", "inStock"];

/// Which rule set a payload is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Every field must be present and non-null.
    Create,
    /// Absent or null fields are allowed; supplied fields are type-checked.
    Update,
}

/// Check a request payload against the product schema.
///
/// # Errors
///
/// Returns `ApiError::Validation` carrying the first violated rule.
pub fn validate(payload: Option<&Value>, schema: Schema) -> Result<(), ApiError> {
    let fields = payload
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("Request body must be a JSON object"))?;

    if schema == Schema::Create {
        check_presence(fields)?;
    }
    check_types(fields)
}

fn check_presence(fields: &Map<String, Value>) -> Result<(), ApiError> {
    for field in REQUIRED_FIELDS {
        let missing = match fields.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(invalid(format!("Missing required field: {field}")));
        }
    }
    Ok(())
}

fn check_types(fields: &Map<String, Value>) -> Result<(), ApiError> {
    for field in TEXT_FIELDS {
        match supplied(fields, field) {
            None => {}
            Some(Value::String(text)) if text.trim().is_empty() => {
                return Err(invalid(format!("{field} must not be empty")));
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(invalid(format!("{field} must be a string"))),
        }
    }

    if let Some(price) = supplied(fields, "price") {
        let price = price
            .as_f64()
            .ok_or_else(|| invalid("price must be a number"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(invalid("price must be a non-negative number"));
        }
    }

    if let Some(in_stock) = supplied(fields, "inStock") {
        if !in_stock.is_boolean() {
            return Err(invalid("inStock must be a boolean"));
        }
    }

    Ok(())
}

/// A field counts as supplied when present and not `null`.
fn supplied<'a>(fields: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    fields.get(field).filter(|value| !value.is_null())
}

fn invalid(reason: impl Into<String>) -> ApiError {
    ApiError::Validation(reason.into())
}
