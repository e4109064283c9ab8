use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Flat key/value chart configuration.
///
/// Keys use the camelCase option names hosts already know (`marginLeft`,
/// `xAxisType`, `colorScale`, ...). A chart's config is the user's values
/// merged over the defaults of its chart kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: IndexMap<String, Value>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from `(key, value)` pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    /// Returns `defaults` with every key present in `user` overridden.
    ///
    /// Default key order is preserved; keys only present in `user` are
    /// appended after them.
    #[must_use]
    pub fn merged(defaults: &Config, user: &Config) -> Self {
        let mut values = defaults.values.clone();
        for (key, value) in &user.values {
            values.insert(key.clone(), value.clone());
        }
        Self { values }
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn required(&self, key: &str) -> ChartResult<&Value> {
        self.values
            .get(key)
            .ok_or_else(|| ChartError::config(key, "missing value"))
    }

    /// Reads a finite number. Numeric strings are accepted.
    pub fn f64(&self, key: &str) -> ChartResult<f64> {
        let value = self.required(key)?;
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(number) if number.is_finite() => Ok(number),
            _ => Err(ChartError::config(
                key,
                format!("expected a finite number, got {value}"),
            )),
        }
    }

    /// Reads a number, falling back to `default` when the key is absent.
    pub fn f64_or(&self, key: &str, default: f64) -> ChartResult<f64> {
        if self.contains(key) {
            self.f64(key)
        } else {
            Ok(default)
        }
    }

    pub fn usize(&self, key: &str) -> ChartResult<usize> {
        let number = self.f64(key)?;
        if number < 0.0 {
            return Err(ChartError::config(key, "expected a non-negative integer"));
        }
        Ok(number as usize)
    }

    pub fn bool(&self, key: &str) -> ChartResult<bool> {
        match self.required(key)? {
            Value::Bool(value) => Ok(*value),
            other => Err(ChartError::config(key, format!("expected a boolean, got {other}"))),
        }
    }

    /// Reads a boolean; absent and `null` values are `false`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(Value::Bool(true)))
    }

    pub fn str(&self, key: &str) -> ChartResult<&str> {
        match self.required(key)? {
            Value::String(text) => Ok(text),
            other => Err(ChartError::config(key, format!("expected a string, got {other}"))),
        }
    }

    /// Reads a string, falling back to `default` when absent or `null`.
    #[must_use]
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.values.get(key) {
            Some(Value::String(text)) => text,
            _ => default,
        }
    }

    /// Optional label text (axis titles, indicator labels); `null` is absent.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Resolves the outer surface width in pixels.
    ///
    /// Accepts a number, a numeric string, `"N%"` (0..=100) of
    /// `containerWidth`, or `"auto"` (the full `containerWidth`).
    pub fn outer_width(&self) -> ChartResult<f64> {
        let value = self.required("width")?;
        let width = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) if text == "auto" => Some(self.f64("containerWidth")?),
            Value::String(text) => {
                if let Some(number) = text.trim().strip_suffix('%') {
                    match number.trim().parse::<f64>() {
                        Ok(percentage) if (0.0..=100.0).contains(&percentage) => {
                            let container = self.f64("containerWidth")?;
                            Some((percentage * container / 100.0).round())
                        }
                        _ => None,
                    }
                } else {
                    text.trim().parse::<f64>().ok()
                }
            }
            _ => None,
        };
        width.filter(|width| width.is_finite()).ok_or_else(|| {
            ChartError::config("width", format!("unknown config width value: {value}"))
        })
    }

    /// Plot width: outer width minus the horizontal margins.
    pub fn inner_width(&self) -> ChartResult<f64> {
        Ok(self.outer_width()? - self.f64("marginLeft")? - self.f64("marginRight")?)
    }

    /// Plot height as configured (margins are added around it).
    pub fn inner_height(&self) -> ChartResult<f64> {
        self.f64("height")
    }

    /// Serializes the config as pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize config: {e}"))
        })
    }

    /// Parses a config from a JSON object.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use serde_json::json;

    fn sized(width: serde_json::Value) -> Config {
        Config::new()
            .with("width", width)
            .with("containerWidth", 1000)
            .with("marginLeft", 50)
            .with("marginRight", 150)
            .with("height", 250)
    }

    #[test]
    fn width_accepts_numbers_percentages_and_auto() {
        assert_eq!(sized(json!(800)).inner_width().expect("numeric"), 600.0);
        assert_eq!(sized(json!("50%")).outer_width().expect("percentage"), 500.0);
        assert_eq!(sized(json!("auto")).outer_width().expect("auto"), 1000.0);
        assert_eq!(sized(json!("640")).outer_width().expect("numeric text"), 640.0);
    }

    #[test]
    fn unknown_width_value_is_a_config_error() {
        let err = sized(json!("wide")).outer_width().expect_err("must fail");
        assert!(err.to_string().contains("width"));
        assert!(sized(json!("150%")).outer_width().is_err());
    }

    #[test]
    fn merge_keeps_default_order_and_user_overrides() {
        let defaults = Config::new().with("a", 1).with("b", 2);
        let user = Config::new().with("b", 20).with("c", 30);
        let merged = Config::merged(&defaults, &user);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(merged.f64("b").expect("b"), 20.0);
    }

    #[test]
    fn typed_getters_report_the_offending_key() {
        let config = Config::new().with("stacked", "yes");
        let err = config.bool("stacked").expect_err("not a bool");
        assert!(err.to_string().contains("`stacked`"));
        assert!(!config.flag("stacked"));
        assert!(config.f64("missing").is_err());
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let config = Config::new().with("height", 250).with("curve", "monotoneX");
        let text = config.to_json_pretty().expect("serialize");
        let parsed = Config::from_json_str(&text).expect("parse");
        assert_eq!(parsed, config);
        assert!(Config::from_json_str("[1, 2]").is_err());
    }
}
