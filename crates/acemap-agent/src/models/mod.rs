//! Data models for the query pipeline.
//!
//! Everything that arrives from a remote collaborator is deserialized
//! through the lenient helpers in [`lenient`], so type-unstable fields
//! (string vs list, number vs numeric string) are coerced at the boundary
//! instead of leaking `serde_json::Value` downstream.

mod intent;
mod paper;
mod plan;

pub use intent::RawIntent;
pub(crate) use paper::AcemapResponse;
pub use paper::{PaperRecord, SearchPage};
pub use plan::{Filters, KeywordChoice, KeywordSource, SearchPlan};

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept a list of strings, a bare string, or null.
    pub fn keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => vec![s],
            Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        })
    }

    /// Accept a string; any other JSON type reads as absent.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
    }

    /// Accept an integer, a float, or a numeric string.
    pub fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(coerce_i64).and_then(|n| i32::try_from(n).ok()))
    }

    /// Same coercion as [`year`], widened for counters.
    pub fn count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(coerce_i64))
    }

    /// Finite fractional values truncate toward zero, so `2023.5` reads as 2023.
    pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn truncate(value: f64) -> Option<i64> {
        value.is_finite().then(|| value.trunc() as i64)
    }

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[cfg(test)]
    mod tests {
        use serde_json::json;

        use super::*;

        #[test]
        fn test_coerce_numbers_and_strings() {
            assert_eq!(coerce_i64(&json!(2023)), Some(2023));
            assert_eq!(coerce_i64(&json!(2023.0)), Some(2023));
            assert_eq!(coerce_i64(&json!(" 2021 ")), Some(2021));
            assert_eq!(coerce_i64(&json!("2021.0")), Some(2021));
        }

        #[test]
        fn test_coerce_truncates_fractional_years() {
            assert_eq!(coerce_i64(&json!(2023.5)), Some(2023));
            assert_eq!(coerce_i64(&json!(2019.99)), Some(2019));
            assert_eq!(coerce_i64(&json!(" 2020.7 ")), Some(2020));
            assert_eq!(coerce_i64(&json!(-0.5)), Some(0));
        }

        #[test]
        fn test_coerce_rejects_non_numeric() {
            assert_eq!(coerce_i64(&json!("NaN")), None);
            assert_eq!(coerce_i64(&json!("inf")), None);
            assert_eq!(coerce_i64(&json!("recent")), None);
            assert_eq!(coerce_i64(&json!(true)), None);
            assert_eq!(coerce_i64(&json!(null)), None);
            assert_eq!(coerce_i64(&json!([2020])), None);
        }
    }
}
