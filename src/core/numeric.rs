//! Lenient numeric decoding for records written by form-driven front-ends,
//! where numbers frequently arrive as strings or nulls.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

fn parse_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decodes a required number, accepting numeric strings.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) if n.is_finite() => Ok(n),
        Raw::Number(n) => Err(D::Error::custom(format!("non-finite number: {n}"))),
        Raw::Text(s) => parse_text(&s).ok_or_else(|| D::Error::custom(format!("not a number: {s:?}"))),
        Raw::Other(v) => Err(D::Error::custom(format!("not a number: {v}"))),
    }
}

/// Decodes an optional number. Malformed values decode as `None` instead of
/// failing the whole record.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Some(n).filter(|v| v.is_finite()),
        Raw::Text(s) => parse_text(&s),
        Raw::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Required {
        #[serde(deserialize_with = "number")]
        value: f64,
    }

    #[derive(Deserialize)]
    struct Optional {
        #[serde(default, deserialize_with = "lenient")]
        value: Option<f64>,
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let r: Required = serde_json::from_str(r#"{"value": " 4.5 "}"#).unwrap();
        assert_eq!(r.value, 4.5);
        let r: Required = serde_json::from_str(r#"{"value": 7}"#).unwrap();
        assert_eq!(r.value, 7.0);
    }

    #[test]
    fn test_number_rejects_garbage() {
        assert!(serde_json::from_str::<Required>(r#"{"value": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Required>(r#"{"value": null}"#).is_err());
        assert!(serde_json::from_str::<Required>(r#"{"value": [1]}"#).is_err());
    }

    #[test]
    fn test_lenient_maps_garbage_to_none() {
        let o: Optional = serde_json::from_str(r#"{"value": "n/a"}"#).unwrap();
        assert_eq!(o.value, None);
        let o: Optional = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(o.value, None);
        let o: Optional = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(o.value, None);
        let o: Optional = serde_json::from_str(r#"{"value": "12.5"}"#).unwrap();
        assert_eq!(o.value, Some(12.5));
    }
}
