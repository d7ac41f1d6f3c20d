//! Metadata cleanup applied by the dataset readers.
//!
//! Strings coming out of CSV cells or JSON fields are sanitized (control
//! characters stripped, surrounding whitespace trimmed) before they become
//! document variables. CSV cells carry no type, so [`infer_value`] recovers
//! integers, floats and booleans from their text.
use serde_json::{Number, Value};

/// Strips control characters (optionally) and trims. Empty results become
/// `None`.
pub(crate) fn sanitize(raw: &str, strip_control: bool) -> Option<String> {
    let filtered: String = if strip_control {
        raw.chars().filter(|c| !c.is_control()).collect()
    } else {
        raw.to_string()
    };
    let trimmed = filtered.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Types a CSV cell: empty → `null`, then integer, float, boolean, string.
pub(crate) fn infer_value(cell: &str, strip_control: bool) -> Value {
    let Some(clean) = sanitize(cell, strip_control) else {
        return Value::Null;
    };
    if let Ok(n) = clean.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = clean.parse::<f64>() {
        // NaN and infinities have no JSON number form
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match clean.as_str() {
        "true" | "TRUE" | "True" => Value::Bool(true),
        "false" | "FALSE" | "False" => Value::Bool(false),
        _ => Value::String(clean),
    }
}

/// Sanitizes every string inside a JSON value, recursing into arrays and
/// objects.
pub(crate) fn sanitize_value(value: Value, strip_control: bool) -> Value {
    match value {
        Value::String(s) => sanitize(&s, strip_control).map_or(Value::Null, Value::String),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| sanitize_value(v, strip_control))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v, strip_control)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sanitize_strips_and_trims() {
        assert_eq!(sanitize("  Swe\u{0007}den \n", true).as_deref(), Some("Sweden"));
        assert_eq!(sanitize("a\u{0007}b", false).as_deref(), Some("a\u{0007}b"));
        assert_eq!(sanitize(" \t ", true), None);
    }

    #[test]
    fn cells_are_typed() {
        assert_eq!(infer_value("1994", true), json!(1994));
        assert_eq!(infer_value("-3", true), json!(-3));
        assert_eq!(infer_value("0.5", true), json!(0.5));
        assert_eq!(infer_value("true", true), json!(true));
        assert_eq!(infer_value("FALSE", true), json!(false));
        assert_eq!(infer_value("Democratic", true), json!("Democratic"));
        assert_eq!(infer_value("", true), Value::Null);
        assert_eq!(infer_value("NaN", true), json!("NaN"));
    }

    #[test]
    fn nested_values_are_sanitized() {
        let raw = json!({"tags": [" a\u{0001} ", "b"], "n": 3, "empty": "  "});
        assert_eq!(
            sanitize_value(raw, true),
            json!({"tags": ["a", "b"], "n": 3, "empty": null})
        );
    }
}
