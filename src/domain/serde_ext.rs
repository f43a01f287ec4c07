//! Deserialization helpers for untidy store rows.
//!
//! Remote tables hold identifiers written by several generations of
//! clients: the same column may carry a JSON number in one row and a
//! string in the next. These adapters accept both.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional identifier that may arrive as a number or a
/// numeric string. Non-numeric values become `None` rather than an error.
pub fn opt_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize an optional string field that may arrive as a JSON number.
pub fn opt_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "opt_lenient_i64")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "opt_lenient_string")]
        label: Option<String>,
    }

    #[test]
    fn numbers_and_strings_both_parse() {
        let row: Row = serde_json::from_str(r#"{"count": "7", "label": 42}"#).unwrap();
        assert_eq!(row.count, Some(7));
        assert_eq!(row.label, Some("42".into()));
    }

    #[test]
    fn garbage_becomes_none() {
        let row: Row = serde_json::from_str(r#"{"count": "x", "label": [1]}"#).unwrap();
        assert_eq!(row.count, None);
        assert_eq!(row.label, None);
    }

    #[test]
    fn missing_and_null_become_none() {
        let row: Row = serde_json::from_str(r#"{"count": null}"#).unwrap();
        assert_eq!(row.count, None);
        assert_eq!(row.label, None);
    }
}
