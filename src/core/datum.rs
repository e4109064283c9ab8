use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{ChartError, ChartResult};

/// One field of a datum.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view: numbers as-is, times as epoch milliseconds.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Time(time) => Some(time.timestamp_millis() as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(time) => Some(*time),
            Self::Number(millis) if millis.is_finite() => {
                Utc.timestamp_millis_opt(*millis as i64).single()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// String used to group datums and to tag marks with `data-proteic-key`.
    ///
    /// Integral numbers render without a fractional part so `3` and `3.0`
    /// share one key.
    #[must_use]
    pub fn key_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Number(value) => Some(format_key_number(*value)),
            Self::Time(time) => Some(time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Text(text) => Some(text.clone()),
        }
    }

    /// Total order used when sorting datums and categorical domains.
    ///
    /// Numbers and times compare numerically, text lexicographically, numbers
    /// sort before text and nulls sort last.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        fn rank(value: &FieldValue) -> u8 {
            match value {
                FieldValue::Bool(_) => 0,
                FieldValue::Number(_) | FieldValue::Time(_) => 1,
                FieldValue::Text(_) => 2,
                FieldValue::Null => 3,
            }
        }

        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (a, b) if rank(a) == 1 && rank(b) == 1 => {
                let a = OrderedFloat(a.as_f64().unwrap_or(f64::NAN));
                let b = OrderedFloat(b.as_f64().unwrap_or(f64::NAN));
                a.cmp(&b)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }

    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(*value),
            Value::Number(number) => number.as_f64().map_or(Self::Null, Self::Number),
            Value::String(text) => Self::Text(text.clone()),
            nested => Self::Text(nested.to_string()),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Number(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Time(time) => Value::String(time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

fn format_key_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

/// Application-defined record plotted by the charts.
///
/// Fields keep insertion order so serialized datums round-trip with the
/// same layout the host supplied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Datum {
    fields: IndexMap<String, FieldValue>,
}

impl Datum {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the field or `FieldValue::Null` when absent.
    #[must_use]
    pub fn field(&self, field: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    #[must_use]
    pub fn time(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_time)
    }

    #[must_use]
    pub fn key(&self, field: &str) -> Option<String> {
        self.get(field).and_then(FieldValue::key_string)
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn from_json(value: Value) -> ChartResult<Self> {
        let Value::Object(object) = value else {
            return Err(ChartError::InvalidData(format!(
                "datum must be a JSON object, got: {value}"
            )));
        };
        Ok(Self {
            fields: object
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
                .collect(),
        })
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.to_json());
        }
        Value::Object(object)
    }
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Datum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

/// Normalizes a JSON payload (one object or an array of objects) into datums.
pub fn datums_from_json(value: Value) -> ChartResult<Vec<Datum>> {
    match value {
        Value::Array(items) => items.into_iter().map(Datum::from_json).collect(),
        single => Ok(vec![Datum::from_json(single)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::{Datum, FieldValue, datums_from_json};
    use serde_json::json;
    use std::cmp::Ordering;

    #[test]
    fn integral_numbers_share_key_with_their_float_spelling() {
        assert_eq!(FieldValue::from(3).key_string().as_deref(), Some("3"));
        assert_eq!(FieldValue::from(3.0).key_string().as_deref(), Some("3"));
        assert_eq!(FieldValue::from(2.5).key_string().as_deref(), Some("2.5"));
    }

    #[test]
    fn total_order_puts_numbers_before_text_and_nulls_last() {
        let number = FieldValue::from(10.0);
        let text = FieldValue::from("a");
        assert_eq!(number.total_cmp(&text), Ordering::Less);
        assert_eq!(FieldValue::Null.total_cmp(&text), Ordering::Greater);
        assert_eq!(
            FieldValue::from(2.0).total_cmp(&FieldValue::from(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn json_payloads_normalize_to_datum_lists() {
        let single = datums_from_json(json!({"x": 1, "y": 2, "key": "A"})).expect("single");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].key("key").as_deref(), Some("A"));

        let many = datums_from_json(json!([{"x": 1}, {"x": 2}])).expect("array");
        assert_eq!(many.len(), 2);
        assert!(datums_from_json(json!(4)).is_err());
    }

    #[test]
    fn datum_serde_round_trips_field_order() {
        let datum = Datum::new().with("key", "A").with("x", 1.0).with("y", 3.5);
        let encoded = serde_json::to_string(&datum).expect("encode");
        assert_eq!(encoded, r#"{"key":"A","x":1.0,"y":3.5}"#);
        let decoded: Datum = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, datum);
    }
}
