//! Dataset reshaping helpers used by the drawing strategies.

use indexmap::IndexMap;

use crate::core::datum::{Datum, FieldValue};
use crate::core::format::{coerce_number, coerce_time};
use crate::core::stack::StackRow;

/// Datums sharing one key value, in first-appearance order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    /// `None` when the datums carry no value for the key field.
    pub key: Option<String>,
    pub values: Vec<Datum>,
}

/// Stable in-place sort by one field (numbers and times numerically, text
/// lexicographically).
pub fn sort_by_field(data: &mut [Datum], field: &str) {
    data.sort_by(|a, b| a.field(field).total_cmp(b.field(field)));
}

/// Groups datums by `key_field`, keeping first-appearance order.
#[must_use]
pub fn nest_by(data: &[Datum], key_field: &str) -> Vec<SeriesGroup> {
    let mut groups: IndexMap<Option<String>, Vec<Datum>> = IndexMap::new();
    for datum in data {
        groups
            .entry(datum.key(key_field))
            .or_default()
            .push(datum.clone());
    }
    groups
        .into_iter()
        .map(|(key, values)| SeriesGroup { key, values })
        .collect()
}

/// Distinct values of `field` in first-appearance order.
#[must_use]
pub fn distinct_keys(data: &[Datum], field: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in data.iter().filter_map(|datum| datum.key(field)) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Distinct values of `field` ordered by [`FieldValue::total_cmp`], as key strings.
///
/// Numeric categories sort by value, so `2` lands before `10`.
#[must_use]
pub fn sorted_distinct_keys(data: &[Datum], field: &str) -> Vec<String> {
    let mut values: Vec<&FieldValue> = data.iter().filter_map(|datum| datum.get(field)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    let mut keys: Vec<String> = Vec::new();
    for key in values.into_iter().filter_map(FieldValue::key_string) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Pivots `(x, key, y)` datums into one row per x with a value per key.
///
/// Rows keep first-appearance order of x; a repeated `(x, key)` pair keeps
/// the last value.
#[must_use]
pub fn simple_to_stacked(
    data: &[Datum],
    x_field: &str,
    key_field: &str,
    y_field: &str,
) -> Vec<StackRow> {
    let mut rows: IndexMap<String, StackRow> = IndexMap::new();
    for datum in data {
        let x = datum.field(x_field);
        let Some(x_key) = x.key_string() else {
            continue;
        };
        let row = rows.entry(x_key).or_insert_with(|| StackRow {
            x: x.clone(),
            values: IndexMap::new(),
        });
        if let (Some(key), Some(value)) = (datum.key(key_field), datum.number(y_field)) {
            row.values.insert(key, value);
        }
    }
    rows.into_values().collect()
}

/// Node/link split of a network dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkedData {
    pub nodes: Vec<Datum>,
    pub links: Vec<Datum>,
}

/// Datums with `class == "link"` are links, everything else is a node.
#[must_use]
pub fn simple_to_linked(data: &[Datum]) -> LinkedData {
    let (links, nodes): (Vec<Datum>, Vec<Datum>) = data
        .iter()
        .cloned()
        .partition(|datum| datum.text("class") == Some("link"));
    LinkedData { nodes, links }
}

/// Axis description used when coercing raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisField<'a> {
    pub field: &'a str,
    pub axis_type: &'a str,
    pub format: &'a str,
}

fn coerce_field(datum: &mut Datum, axis: AxisField<'_>) {
    let value = match axis.axis_type {
        "time" => coerce_time(datum.field(axis.field), axis.format),
        "linear" => coerce_number(datum.field(axis.field)),
        _ => return,
    };
    datum.set(axis.field, value);
}

/// Coerces the x and y fields to the representation their axis needs:
/// `time` parses with the axis format, `linear` converts to numbers and
/// `categorical` keeps the raw value.
pub fn convert_by_xy_format(data: &mut [Datum], x: AxisField<'_>, y: AxisField<'_>) {
    for datum in data {
        coerce_field(datum, x);
        coerce_field(datum, y);
    }
}

/// Parses each of `fields` as a time with `format`.
pub fn convert_fields_to_time(data: &mut [Datum], fields: &[&str], format: &str) {
    for datum in data {
        for field in fields {
            let value = coerce_time(datum.field(field), format);
            datum.set(*field, value);
        }
    }
}

/// Numeric values of `field`, skipping datums without one.
#[must_use]
pub fn numbers(data: &[Datum], field: &str) -> Vec<f64> {
    data.iter().filter_map(|datum| datum.number(field)).collect()
}

/// `[min, max]` of a numeric (or time) field.
#[must_use]
pub fn numeric_extent(data: &[Datum], field: &str) -> Option<(f64, f64)> {
    numbers(data, field)
        .into_iter()
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
        })
}

/// Keeps the value with `FieldValue::Null` replaced by `fallback`'s field.
#[must_use]
pub fn field_or<'a>(datum: &'a Datum, field: &str, fallback: &str) -> &'a FieldValue {
    match datum.field(field) {
        FieldValue::Null => datum.field(fallback),
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AxisField, convert_by_xy_format, distinct_keys, nest_by, numeric_extent, sorted_distinct_keys,
        simple_to_linked, simple_to_stacked, sort_by_field,
    };
    use crate::core::datum::{Datum, FieldValue};

    fn point(key: &str, x: f64, y: f64) -> Datum {
        Datum::new().with("key", key).with("x", x).with("y", y)
    }

    #[test]
    fn nesting_preserves_first_appearance_order() {
        let data = vec![point("B", 1.0, 1.0), point("A", 1.0, 2.0), point("B", 2.0, 3.0)];
        let groups = nest_by(&data, "key");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.as_deref(), Some("B"));
        assert_eq!(groups[0].values.len(), 2);
        assert_eq!(distinct_keys(&data, "key"), vec!["B", "A"]);
        assert_eq!(sorted_distinct_keys(&data, "key"), vec!["A", "B"]);
    }

    #[test]
    fn missing_keys_nest_into_one_unnamed_group() {
        let data = vec![Datum::new().with("x", 1.0), Datum::new().with("x", 2.0)];
        let groups = nest_by(&data, "key");
        assert_eq!(groups.len(), 1);
        assert!(groups[0].key.is_none());
    }

    #[test]
    fn stacked_rows_pivot_keys_per_x() {
        let data = vec![point("A", 1.0, 3.0), point("B", 1.0, 2.0), point("A", 2.0, 1.0)];
        let rows = simple_to_stacked(&data, "x", "key", "y");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values.get("B"), Some(&2.0));
        assert_eq!(rows[1].values.get("B"), None);
    }

    #[test]
    fn xy_conversion_parses_times_and_numbers() {
        let mut data = vec![Datum::new().with("x", "16/01/02").with("y", "4.5")];
        convert_by_xy_format(
            &mut data,
            AxisField { field: "x", axis_type: "time", format: "%y/%m/%d" },
            AxisField { field: "y", axis_type: "linear", format: "" },
        );
        assert!(matches!(data[0].field("x"), FieldValue::Time(_)));
        assert_eq!(data[0].number("y"), Some(4.5));
    }

    #[test]
    fn sorting_and_extent_follow_numeric_order() {
        let mut data = vec![point("A", 10.0, 1.0), point("A", 2.0, 5.0)];
        sort_by_field(&mut data, "x");
        assert_eq!(data[0].number("x"), Some(2.0));
        assert_eq!(numeric_extent(&data, "y"), Some((1.0, 5.0)));
    }

    #[test]
    fn link_datums_are_split_from_nodes() {
        let data = vec![
            Datum::new().with("id", "a"),
            Datum::new().with("class", "link").with("source", "a").with("target", "b"),
            Datum::new().with("id", "b"),
        ];
        let linked = simple_to_linked(&data);
        assert_eq!(linked.nodes.len(), 2);
        assert_eq!(linked.links.len(), 1);
    }
}
