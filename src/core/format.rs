//! Number formatting specifiers (`".1f"`, `"s"`, `",d"`, ...) and time
//! parsing for axis values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::core::datum::FieldValue;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Parens,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Default,
    Fixed,
    Exponent,
    General,
    Rounded,
    Prefix,
    Percent,
    Integer,
}

/// Parsed number format specifier:
/// `[[fill]align][sign][0][width][,][.precision][type]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormat {
    fill: char,
    align: Align,
    sign: Sign,
    zero: bool,
    width: Option<usize>,
    comma: bool,
    precision: Option<usize>,
    kind: Kind,
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

impl NumberFormat {
    pub fn parse(specifier: &str) -> ChartResult<Self> {
        let invalid =
            || ChartError::config("format", format!("invalid number format: {specifier:?}"));
        let chars: Vec<char> = specifier.chars().collect();
        let mut format = Self {
            fill: ' ',
            align: Align::Right,
            sign: Sign::Minus,
            zero: false,
            width: None,
            comma: false,
            precision: None,
            kind: Kind::Default,
        };
        let mut index = 0;

        if chars.len() >= 2 {
            if let Some(align) = align_of(chars[1]) {
                format.fill = chars[0];
                format.align = align;
                index = 2;
            }
        }
        if index == 0 {
            if let Some(align) = chars.first().copied().and_then(align_of) {
                format.align = align;
                index = 1;
            }
        }
        if let Some(sign) = chars.get(index).and_then(|c| match c {
            '-' => Some(Sign::Minus),
            '+' => Some(Sign::Plus),
            '(' => Some(Sign::Parens),
            ' ' => Some(Sign::Space),
            _ => None,
        }) {
            format.sign = sign;
            index += 1;
        }
        if chars.get(index) == Some(&'0') {
            format.zero = true;
            format.fill = '0';
            format.align = Align::AfterSign;
            index += 1;
        }
        let width_start = index;
        while chars.get(index).is_some_and(char::is_ascii_digit) {
            index += 1;
        }
        if index > width_start {
            let digits: String = chars[width_start..index].iter().collect();
            format.width = Some(digits.parse().map_err(|_| invalid())?);
        }
        if chars.get(index) == Some(&',') {
            format.comma = true;
            index += 1;
        }
        if chars.get(index) == Some(&'.') {
            index += 1;
            let precision_start = index;
            while chars.get(index).is_some_and(char::is_ascii_digit) {
                index += 1;
            }
            if index == precision_start {
                return Err(invalid());
            }
            let digits: String = chars[precision_start..index].iter().collect();
            format.precision = Some(digits.parse().map_err(|_| invalid())?);
        }
        if let Some(kind) = chars.get(index) {
            format.kind = match kind {
                'f' => Kind::Fixed,
                'e' => Kind::Exponent,
                'g' => Kind::General,
                'r' => Kind::Rounded,
                's' => Kind::Prefix,
                '%' => Kind::Percent,
                'd' => Kind::Integer,
                _ => return Err(invalid()),
            };
            index += 1;
        }
        if index != chars.len() {
            return Err(invalid());
        }
        Ok(format)
    }

    fn body(&self, value: f64) -> String {
        let precision = self.precision.unwrap_or(match self.kind {
            Kind::Default => 12,
            _ => 6,
        });
        match self.kind {
            Kind::Default => trim_insignificant(&to_precision(value, precision.max(1))),
            Kind::Fixed => format!("{value:.precision$}"),
            Kind::Exponent => to_exponential(value, precision),
            Kind::General => to_precision(value, precision.max(1)),
            Kind::Rounded => to_rounded(value, precision.max(1)),
            Kind::Prefix => to_prefix(value, precision.max(1)),
            Kind::Percent => format!("{:.precision$}", value * 100.0),
            Kind::Integer => format!("{}", value.round()),
        }
    }

    /// Formats `value` following the specifier.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let mut body = self.body(value.abs());
        let negative = value < 0.0 && body.chars().any(|c| matches!(c, '1'..='9'));
        if self.comma {
            body = group_thousands(&body);
        }
        let suffix = if self.kind == Kind::Percent { "%" } else { "" };
        let (prefix, closing) = match (negative, self.sign) {
            (true, Sign::Parens) => ("(", ")"),
            (true, _) => ("-", ""),
            (false, Sign::Plus) => ("+", ""),
            (false, Sign::Space) => (" ", ""),
            (false, _) => ("", ""),
        };
        let content_len = prefix.chars().count()
            + body.chars().count()
            + suffix.chars().count()
            + closing.chars().count();
        let padding = self
            .width
            .map_or(0, |width| width.saturating_sub(content_len));
        let fill: String = std::iter::repeat_n(self.fill, padding).collect();
        match self.align {
            Align::Left => format!("{prefix}{body}{suffix}{closing}{fill}"),
            Align::Center => {
                let (left, right) = fill.split_at(padding / 2);
                format!("{left}{prefix}{body}{suffix}{closing}{right}")
            }
            Align::AfterSign => format!("{prefix}{fill}{body}{suffix}{closing}"),
            Align::Right => format!("{fill}{prefix}{body}{suffix}{closing}"),
        }
    }
}

/// Formats with `precision` significant digits, switching to exponential
/// notation outside `[1e-6, 10^precision)`.
fn to_precision(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }
    let (digits, exponent) = decimal_parts(value, precision);
    if exponent < -6 || exponent >= precision as i32 {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exponent.abs());
    }
    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    format!("{value:.decimals$}")
}

fn to_rounded(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let (_, exponent) = decimal_parts(value, precision);
    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    format!("{value:.decimals$}")
}

fn to_exponential(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => format!("{mantissa}e{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}e+{exponent}"),
        None => text,
    }
}

/// Significant digits (without the decimal point) and decimal exponent.
fn decimal_parts(value: f64, precision: usize) -> (String, i32) {
    let text = format!("{:.*e}", precision.saturating_sub(1), value);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent.parse().unwrap_or(0))
}

fn to_prefix(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return to_precision(0.0, precision);
    }
    let (digits, exponent) = decimal_parts(value, precision);
    let prefix_exponent = (exponent.div_euclid(3)).clamp(-8, 8) * 3;
    let integer_digits = exponent - prefix_exponent + 1;
    let count = digits.len() as i32;
    let body = if integer_digits == count {
        digits
    } else if integer_digits > count {
        format!("{digits}{}", "0".repeat((integer_digits - count) as usize))
    } else if integer_digits > 0 {
        let split = integer_digits as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else {
        let scaled = value / 10f64.powi(prefix_exponent);
        let (rest, _) = decimal_parts(scaled, (precision as i32 + integer_digits - 1).max(1) as usize);
        format!("0.{}{}", "0".repeat((1 - integer_digits) as usize), rest)
    };
    let prefix = SI_PREFIXES[(8 + prefix_exponent / 3) as usize];
    format!("{body}{prefix}")
}

fn trim_insignificant(text: &str) -> String {
    let (mantissa, exponent) = match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (text, None),
    };
    let trimmed = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    match exponent {
        Some(exponent) => format!("{trimmed}e{exponent}"),
        None => trimmed.to_owned(),
    }
}

fn group_thousands(body: &str) -> String {
    let split = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(split);
    let mut grouped = String::with_capacity(body.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(rest);
    grouped
}

/// Shorthand for `NumberFormat::parse(specifier)?.format(value)`.
pub fn format_number(specifier: &str, value: f64) -> ChartResult<String> {
    Ok(NumberFormat::parse(specifier)?.format(value))
}

fn chrono_pattern(format: &str) -> String {
    format.replace("%L", "%3f")
}

/// Parses `text` with a strftime-style pattern as a UTC instant.
///
/// Patterns without time fields resolve to midnight.
#[must_use]
pub fn parse_time(text: &str, format: &str) -> Option<DateTime<Utc>> {
    let pattern = chrono_pattern(format);
    if let Ok(value) = NaiveDateTime::parse_from_str(text, &pattern) {
        return Some(value.and_utc());
    }
    NaiveDate::parse_from_str(text, &pattern)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|value| value.and_utc())
}

/// Formats a UTC instant with a strftime-style pattern.
#[must_use]
pub fn format_time(time: DateTime<Utc>, format: &str) -> String {
    time.format(&chrono_pattern(format)).to_string()
}

/// Coerces a field into a time value: text is parsed with `format`, numbers
/// are epoch milliseconds. Unparseable values become `Null`.
#[must_use]
pub fn coerce_time(value: &FieldValue, format: &str) -> FieldValue {
    match value {
        FieldValue::Time(_) => value.clone(),
        FieldValue::Text(text) => parse_time(text, format).map_or(FieldValue::Null, FieldValue::Time),
        FieldValue::Number(_) => value.as_time().map_or(FieldValue::Null, FieldValue::Time),
        _ => FieldValue::Null,
    }
}

/// Coerces a field into a number the way unary `+` would: numeric text is
/// parsed, blank text is zero, anything else becomes `Null`.
#[must_use]
pub fn coerce_number(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Number(_) => value.clone(),
        FieldValue::Bool(flag) => FieldValue::Number(if *flag { 1.0 } else { 0.0 }),
        FieldValue::Time(_) => value.as_f64().map_or(FieldValue::Null, FieldValue::Number),
        FieldValue::Text(text) if text.trim().is_empty() => FieldValue::Number(0.0),
        FieldValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map_or(FieldValue::Null, FieldValue::Number),
        FieldValue::Null => FieldValue::Null,
    }
}
