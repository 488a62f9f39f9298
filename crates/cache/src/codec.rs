//! Encoding and defensive decoding of cached payloads.
//!
//! Different writer versions have stored records either in their typed shape
//! or as a loosely typed map: numbers written as strings, prices as decimal
//! major units, Jackson-style `"@class"` hints and `["java.util.ArrayList", [..]]`
//! list envelopes. Decoding tries the typed shape first and falls back to a
//! field-by-field read through [`Fields`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use common::Money;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{CacheError, Result};

/// A value that can be stored in and read back from the cache.
pub trait CacheRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Rebuilds the record from a payload that did not match the typed shape.
    fn from_untyped(value: &Value) -> Result<Self>;
}

/// The two shapes a cached payload may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum CachedPayload<T> {
    Typed(T),
    Untyped(Value),
}

impl<T: CacheRecord> CachedPayload<T> {
    fn resolve(self) -> Result<T> {
        match self {
            CachedPayload::Typed(record) => Ok(record),
            CachedPayload::Untyped(value) => T::from_untyped(&value),
        }
    }
}

/// Serializes a record for storage.
pub fn encode<T: Serialize>(record: &T) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Decodes a stored payload, falling back to the map shape when the typed shape fails.
pub fn decode<T: CacheRecord>(raw: &str) -> Result<T> {
    serde_json::from_str::<CachedPayload<T>>(raw)?.resolve()
}

/// Decodes an already-parsed JSON value the same way [`decode`] does.
pub fn decode_value<T: CacheRecord>(value: Value) -> Result<T> {
    serde_json::from_value::<CachedPayload<T>>(value)?.resolve()
}

/// Strips a `[type-name, value]` envelope if present.
pub fn unwrap_type_hint(value: &Value) -> &Value {
    match value {
        Value::Array(items) => match items.as_slice() {
            [Value::String(_), inner] => inner,
            _ => value,
        },
        _ => value,
    }
}

impl<T: CacheRecord> CacheRecord for Vec<T> {
    fn from_untyped(value: &Value) -> Result<Self> {
        match unwrap_type_hint(value) {
            Value::Array(items) => items.iter().cloned().map(decode_value::<T>).collect(),
            other => Err(CacheError::decode(
                "list",
                format!("expected array, found {}", json_kind(other)),
            )),
        }
    }
}

/// Lenient field accessor over a map-shaped payload.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    record: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Views `value` as the fields of a `record`, unwrapping any type-hint envelope.
    pub fn of(value: &'a Value, record: &'static str) -> Result<Self> {
        match unwrap_type_hint(value) {
            Value::Object(map) => Ok(Self { record, map }),
            other => Err(CacheError::decode(
                record,
                format!("expected object, found {}", json_kind(other)),
            )),
        }
    }

    /// Returns the first candidate name present in the payload, or the first
    /// candidate if none is. Lets a record accept both `snake_case` and
    /// `camelCase` spellings of a field.
    pub fn pick<'n>(&self, candidates: &[&'n str]) -> &'n str {
        candidates
            .iter()
            .copied()
            .find(|name| self.get(name).is_some())
            .or_else(|| candidates.first().copied())
            .unwrap_or_default()
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map
            .get(name)
            .map(unwrap_type_hint)
            .filter(|value| !value.is_null())
    }

    fn require(&self, name: &str) -> Result<&'a Value> {
        self.get(name)
            .ok_or_else(|| CacheError::decode(self.record, format!("missing field `{name}`")))
    }

    fn invalid(&self, name: &str, value: &Value) -> CacheError {
        CacheError::decode(
            self.record,
            format!("field `{name}` has unusable {}", json_kind(value)),
        )
    }

    /// Reads an integer written as a number or a numeric string.
    pub fn i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(name, value))
    }

    /// Reads a non-negative integer that fits in `u32`.
    pub fn u32(&self, name: &str) -> Result<u32> {
        let raw = self.i64(name)?;
        u32::try_from(raw).map_err(|_| {
            CacheError::decode(self.record, format!("field `{name}` out of range: {raw}"))
        })
    }

    /// Reads a required string; scalars are rendered as text.
    pub fn string(&self, name: &str) -> Result<String> {
        let value = self.require(name)?;
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(self.invalid(name, other)),
        }
    }

    /// Reads an optional string, defaulting to empty when absent or null.
    pub fn string_or_default(&self, name: &str) -> Result<String> {
        match self.get(name) {
            Some(_) => self.string(name),
            None => Ok(String::new()),
        }
    }

    /// Reads a money amount.
    ///
    /// Accepts the typed `{"cents": n}` shape, a decimal number or numeric
    /// string in major units, or a sibling `<name>_cents` integer.
    pub fn money(&self, name: &str) -> Result<Money> {
        let Some(value) = self.get(name) else {
            let cents_field = format!("{name}_cents");
            return self.i64(&cents_field).map(Money::from_cents);
        };

        let parsed = match value {
            Value::Object(_) => Fields::of(value, self.record)
                .and_then(|inner| inner.i64("cents"))
                .ok()
                .map(Money::from_cents),
            Value::Number(n) => n.as_f64().map(Money::from_major),
            Value::String(s) => s.trim().parse::<f64>().ok().map(Money::from_major),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(name, value))
    }

    /// Reads a timestamp written as RFC 3339, as a naive ISO local time
    /// (taken as UTC), or as a `[y, m, d, h, min, s, nanos?]` array.
    pub fn datetime(&self, name: &str) -> Result<DateTime<Utc>> {
        let value = self.require(name)?;
        let parsed = match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .map(|naive| naive.and_utc())
                }),
            Value::Array(parts) => datetime_from_parts(parts),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(name, value))
    }

    /// Reads a list field; absent or null lists read as empty.
    pub fn list(&self, name: &str) -> Result<&'a [Value]> {
        match self.get(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(self.invalid(name, other)),
        }
    }
}

fn datetime_from_parts(parts: &[Value]) -> Option<DateTime<Utc>> {
    let numbers: Vec<i64> = parts.iter().map(Value::as_i64).collect::<Option<_>>()?;
    let (date, time) = numbers.split_at_checked(3)?;
    let [year, month, day] = date else {
        return None;
    };
    let hour = time.first().copied().unwrap_or(0);
    let minute = time.get(1).copied().unwrap_or(0);
    let second = time.get(2).copied().unwrap_or(0);
    let nanos = time.get(3).copied().unwrap_or(0);

    NaiveDate::from_ymd_opt(
        i32::try_from(*year).ok()?,
        u32::try_from(*month).ok()?,
        u32::try_from(*day).ok()?,
    )?
    .and_hms_nano_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
        u32::try_from(nanos).ok()?,
    )
    .map(|naive| naive.and_utc())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        sku: i64,
        price: Money,
    }

    impl CacheRecord for Line {
        fn from_untyped(value: &Value) -> Result<Self> {
            let fields = Fields::of(value, "line")?;
            Ok(Line {
                sku: fields.i64("sku")?,
                price: fields.money("price")?,
            })
        }
    }

    #[test]
    fn typed_payload_decodes_directly() {
        let raw = encode(&Line {
            sku: 1,
            price: Money::from_cents(250),
        })
        .unwrap();

        let line: Line = decode(&raw).unwrap();
        assert_eq!(line.price.cents(), 250);
    }

    #[test]
    fn map_payload_falls_back_to_field_reads() {
        let raw = json!({"@class": "com.example.Line", "sku": "9", "price": 10.0}).to_string();
        let line: Line = decode(&raw).unwrap();
        assert_eq!(
            line,
            Line {
                sku: 9,
                price: Money::from_cents(1000)
            }
        );
    }

    #[test]
    fn cents_sibling_field_is_accepted() {
        let raw = json!({"sku": 2, "price_cents": 499}).to_string();
        let line: Line = decode(&raw).unwrap();
        assert_eq!(line.price.cents(), 499);
    }

    #[test]
    fn list_envelope_is_unwrapped() {
        let raw = json!([
            "java.util.ArrayList",
            [{"sku": 1, "price": "1.50"}, {"sku": 2, "price": {"cents": 300}}]
        ])
        .to_string();

        let lines: Vec<Line> = decode(&raw).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].price.cents(), 150);
        assert_eq!(lines[1].price.cents(), 300);
    }

    #[test]
    fn unusable_payload_fails_loudly() {
        let err = decode::<Line>(&json!({"sku": true}).to_string()).unwrap_err();
        assert!(matches!(err, CacheError::Decode { record: "line", .. }));

        let err = decode::<Line>("not json").unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn datetime_accepts_every_written_shape() {
        let value = json!({
            "a": "2024-03-01T10:15:30Z",
            "b": "2024-03-01T10:15:30.125",
            "c": [2024, 3, 1, 10, 15, 30]
        });
        let fields = Fields::of(&value, "stamp").unwrap();

        for name in ["a", "b", "c"] {
            let dt = fields.datetime(name).unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
            assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 15, 30));
        }
    }

    #[test]
    fn pick_prefers_the_spelling_present() {
        let value = json!({"userId": 4});
        let fields = Fields::of(&value, "cart").unwrap();
        assert_eq!(fields.pick(&["user_id", "userId"]), "userId");
        assert_eq!(fields.pick(&["missing", "other"]), "missing");
    }

    #[test]
    fn absent_list_reads_as_empty() {
        let value = json!({"items": null});
        let fields = Fields::of(&value, "cart").unwrap();
        assert!(fields.list("items").unwrap().is_empty());
        assert!(fields.list("other").unwrap().is_empty());
    }
}
