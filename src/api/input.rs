//! Lenient request field parsing
//!
//! Form clients send numbers either as JSON numbers or as strings, and
//! blank inputs as `""`. These helpers accept all three.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 2^63, the first value past `i64::MAX`
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn number_from(value: Value) -> Result<Option<f64>, String> {
    let number = match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().ok_or_else(|| "invalid number".to_string())?),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s))?,
        ),
        other => return Err(format!("expected a number, got {}", other)),
    };

    match number {
        Some(v) if !v.is_finite() => Err(format!("{} is not a finite number", v)),
        other => Ok(other),
    }
}

fn to_i64(value: f64) -> Result<i64, String> {
    let rounded = value.round();
    if rounded >= I64_LIMIT || rounded < -I64_LIMIT {
        return Err(format!("{} is out of range", value));
    }
    Ok(rounded as i64)
}

/// `Option<f64>` from a number, numeric string, `""` or `null`
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    number_from(value).map_err(serde::de::Error::custom)
}

/// `Option<i64>` from a number, numeric string, `""` or `null`.
/// Fractions are rounded; values outside `i64` are rejected.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value.as_i64() {
        return Ok(Some(exact));
    }
    number_from(value)
        .and_then(|n| n.map(to_i64).transpose())
        .map_err(serde::de::Error::custom)
}

/// Trimmed string, `None` when blank
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "lenient_i64")]
        kalori: Option<i64>,
        #[serde(default, deserialize_with = "lenient_f64")]
        berat: Option<f64>,
    }

    fn parse(value: Value) -> Result<Form, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_numbers_and_strings() {
        let form = parse(json!({ "kalori": "250", "berat": 70.5 })).unwrap();
        assert_eq!(form.kalori, Some(250));
        assert_eq!(form.berat, Some(70.5));

        let form = parse(json!({ "kalori": 120.6, "berat": " 65 " })).unwrap();
        assert_eq!(form.kalori, Some(121));
        assert_eq!(form.berat, Some(65.0));
    }

    #[test]
    fn test_blank_and_missing() {
        let form = parse(json!({ "kalori": "", "berat": null })).unwrap();
        assert_eq!(form.kalori, None);
        assert_eq!(form.berat, None);

        let form = parse(json!({})).unwrap();
        assert_eq!(form.kalori, None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse(json!({ "kalori": "banyak" })).is_err());
        assert!(parse(json!({ "kalori": [1] })).is_err());
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(parse(json!({ "kalori": 1e19 })).is_err());
        assert!(parse(json!({ "kalori": "-1e19" })).is_err());
        assert!(parse(json!({ "kalori": "inf" })).is_err());
        assert!(parse(json!({ "berat": "NaN" })).is_err());

        let form = parse(json!({ "kalori": i64::MAX })).unwrap();
        assert_eq!(form.kalori, Some(i64::MAX));
        let form = parse(json!({ "kalori": -9.2e18 })).unwrap();
        assert_eq!(form.kalori, Some(-9_200_000_000_000_000_000));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Budi ".into())), Some("Budi".into()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
