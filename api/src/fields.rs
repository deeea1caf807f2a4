//! Lenient accessors over raw provider JSON.
//!
//! Providers disagree on whether ids, scores and prices travel as strings or
//! numbers, and any field may be missing or null. Everything here returns
//! `None` instead of failing so extractors can fall back field by field.

use serde_json::Value;

/// First key that is present and not null.
pub(crate) fn first<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| raw.get(*k)).find(|v| !v.is_null())
}

pub(crate) fn has(raw: &Value, key: &str) -> bool {
    raw.get(key).is_some_and(|v| !v.is_null())
}

/// Non-empty trimmed string, or a number rendered as a string.
pub(crate) fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn text_of(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(text)
}

/// A string field, or the `name` of an object in that field.
pub(crate) fn name_of(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(|v| match v {
        Value::Object(_) => text_of(v, &["name"]),
        other => text(other),
    })
}

/// Finite number from a JSON number or a numeric string ("1.85", "1,85").
pub(crate) fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub(crate) fn number_of(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(number)
}

/// Non-negative whole number. Fractional values are rejected.
pub(crate) fn count(v: &Value) -> Option<u32> {
    let n = number(v)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

pub(crate) fn count_of(raw: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(count)
}

pub(crate) fn integer_of(raw: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Booleans, plus the "true"/"false"/1/0 spellings some feeds use.
pub(crate) fn flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn flag_of(raw: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(flag)
}

/// Array field as a slice; anything else is empty.
pub(crate) fn list<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Opaque passthrough for events/lineups: arrays as-is, a lone object wrapped.
pub(crate) fn passthrough_list(v: Option<&Value>) -> Vec<Value> {
    match v {
        Some(Value::Array(items)) => items.clone(),
        Some(obj @ Value::Object(_)) => vec![obj.clone()],
        _ => Vec::new(),
    }
}

/// Opaque passthrough for stats: anything non-null.
pub(crate) fn passthrough(v: Option<&Value>) -> Option<Value> {
    v.filter(|v| !v.is_null()).cloned()
}

/// "2-1", "2:1" or "2 - 1" into a score pair.
pub(crate) fn score_pair(s: &str) -> Option<(u32, u32)> {
    let (home, away) = s.split_once(['-', ':'])?;
    Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_accepts_strings_and_numbers() {
        assert_eq!(text(&json!(" abc ")), Some("abc".into()));
        assert_eq!(text(&json!(12345)), Some("12345".into()));
        assert_eq!(text(&json!("")), None);
        assert_eq!(text(&json!(null)), None);
        assert_eq!(text(&json!({"a": 1})), None);
    }

    #[test]
    fn number_parses_numeric_strings() {
        assert_eq!(number(&json!("1.85")), Some(1.85));
        assert_eq!(number(&json!("2,10")), Some(2.1));
        assert_eq!(number(&json!(3)), Some(3.0));
        assert_eq!(number(&json!("abc")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
    }

    #[test]
    fn count_rejects_negative_and_fractional() {
        assert_eq!(count(&json!(2)), Some(2));
        assert_eq!(count(&json!("0")), Some(0));
        assert_eq!(count(&json!(-1)), None);
        assert_eq!(count(&json!(1.5)), None);
    }

    #[test]
    fn first_skips_null_values() {
        let raw = json!({"a": null, "b": "x"});
        assert_eq!(first(&raw, &["a", "b"]), Some(&json!("x")));
        assert!(!has(&raw, "a"));
        assert!(has(&raw, "b"));
    }

    #[test]
    fn name_of_reads_plain_strings_and_named_objects() {
        let raw = json!({"league": {"name": "Süper Lig"}, "country": "Turkey"});
        assert_eq!(name_of(&raw, &["league"]), Some("Süper Lig".into()));
        assert_eq!(name_of(&raw, &["country"]), Some("Turkey".into()));
    }

    #[test]
    fn flag_understands_string_spellings() {
        assert_eq!(flag(&json!(true)), Some(true));
        assert_eq!(flag(&json!("false")), Some(false));
        assert_eq!(flag(&json!(1)), Some(true));
        assert_eq!(flag(&json!("maybe")), None);
    }

    #[test]
    fn passthrough_list_wraps_objects() {
        assert_eq!(passthrough_list(Some(&json!([1, 2]))).len(), 2);
        assert_eq!(passthrough_list(Some(&json!({"a": 1}))).len(), 1);
        assert!(passthrough_list(Some(&json!(null))).is_empty());
        assert!(passthrough_list(None).is_empty());
    }

    #[test]
    fn score_pair_splits_common_separators() {
        assert_eq!(score_pair("2-1"), Some((2, 1)));
        assert_eq!(score_pair("0:0"), Some((0, 0)));
        assert_eq!(score_pair("3 - 2"), Some((3, 2)));
        assert_eq!(score_pair("?-?"), None);
    }
}
