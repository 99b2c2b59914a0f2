use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use depot_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

// 2^63 is exactly representable as f64; anything at or above it overflows i64.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Supported field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// UTF-8 string field.
    Text,
    /// Signed 64-bit integer field.
    Integer,
    /// Floating-point field.
    Float,
    /// Calendar date field (`YYYY-MM-DD`).
    Date,
}

impl FieldKind {
    /// Returns a stable name for the field kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Date => "date",
        }
    }
}

/// Typed value produced by coercing a payload attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Calendar date value.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the kind of the value.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Date(_) => FieldKind::Date,
        }
    }

    /// Returns the integer payload when the value is an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload when the value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Projects the value back into JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(value) => Value::String(value.clone()),
            Self::Integer(value) => Value::Number(Number::from(*value)),
            Self::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Date(value) => Value::String(value.format(DATE_FORMAT).to_string()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => formatter.write_str(value),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Date(value) => write!(formatter, "{}", value.format(DATE_FORMAT)),
        }
    }
}

/// Schema entry for a single entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    name: NonEmptyString,
    kind: FieldKind,
    max_length: Option<usize>,
    is_required: bool,
    is_business_key: bool,
}

impl FieldDefinition {
    /// Creates a validated field definition.
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        max_length: Option<usize>,
        is_required: bool,
        is_business_key: bool,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;

        match (kind, max_length) {
            (FieldKind::Text, Some(0)) => {
                return Err(AppError::Validation(format!(
                    "field '{}' declares a zero max length",
                    name.as_str()
                )));
            }
            (FieldKind::Text, _) | (_, None) => {}
            (_, Some(_)) => {
                return Err(AppError::Validation(format!(
                    "max length is only allowed for text fields, got '{}' on '{}'",
                    kind.as_str(),
                    name.as_str()
                )));
            }
        }

        if is_business_key && kind == FieldKind::Float {
            return Err(AppError::Validation(format!(
                "float field '{}' cannot be a business key",
                name.as_str()
            )));
        }

        Ok(Self {
            name,
            kind,
            max_length,
            is_required,
            is_business_key,
        })
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the maximum length in characters for text fields.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns whether a create payload must carry the field.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Returns whether the field value must be unique across the entity kind.
    #[must_use]
    pub fn is_business_key(&self) -> bool {
        self.is_business_key
    }

    /// Coerces a raw payload value into the declared kind.
    pub fn coerce(&self, value: &Value) -> AppResult<FieldValue> {
        match self.kind {
            FieldKind::Text => self.coerce_text(value),
            FieldKind::Integer => self.coerce_integer(value),
            FieldKind::Float => value
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| self.invalid_type()),
            FieldKind::Date => value
                .as_str()
                .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
                .map(FieldValue::Date)
                .ok_or_else(|| self.invalid_type()),
        }
    }

    fn coerce_text(&self, value: &Value) -> AppResult<FieldValue> {
        let text = value.as_str().ok_or_else(|| self.invalid_type())?;

        if let Some(limit) = self.max_length
            && text.chars().count() > limit
        {
            return Err(AppError::FieldTooLong {
                field: self.name().to_owned(),
                limit,
            });
        }

        if (self.is_required || self.is_business_key) && text.trim().is_empty() {
            return Err(AppError::EmptyRequiredField {
                field: self.name().to_owned(),
            });
        }

        Ok(FieldValue::Text(text.to_owned()))
    }

    fn coerce_integer(&self, value: &Value) -> AppResult<FieldValue> {
        let Value::Number(number) = value else {
            return Err(self.invalid_type());
        };

        if let Some(integer) = number.as_i64() {
            return Ok(FieldValue::Integer(integer));
        }

        // Untyped JSON decoding often yields floats for whole numbers.
        match number.as_f64() {
            Some(float)
                if float.fract() == 0.0 && float >= -I64_UPPER_BOUND && float < I64_UPPER_BOUND =>
            {
                Ok(FieldValue::Integer(float as i64))
            }
            _ => Err(self.invalid_type()),
        }
    }

    fn invalid_type(&self) -> AppError {
        AppError::InvalidType {
            field: self.name().to_owned(),
            expected: self.kind.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use depot_core::AppError;
    use serde_json::json;

    use super::{FieldDefinition, FieldKind, FieldValue};

    fn field(kind: FieldKind, max_length: Option<usize>) -> FieldDefinition {
        FieldDefinition::new("value", kind, max_length, true, false)
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn max_length_is_rejected_on_non_text_fields() {
        let result = FieldDefinition::new("capacity", FieldKind::Integer, Some(4), true, false);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn float_business_keys_are_rejected() {
        let result = FieldDefinition::new("weight", FieldKind::Float, None, true, true);
        assert!(result.is_err());
    }

    #[test]
    fn integer_accepts_whole_floats() {
        let coerced = field(FieldKind::Integer, None).coerce(&json!(12.0));
        assert_eq!(coerced.ok(), Some(FieldValue::Integer(12)));
    }

    #[test]
    fn integer_rejects_fractional_floats() {
        let coerced = field(FieldKind::Integer, None).coerce(&json!(12.5));
        assert!(matches!(
            coerced,
            Err(AppError::InvalidType {
                expected: "integer",
                ..
            })
        ));
    }

    #[test]
    fn integer_rejects_out_of_range_numbers() {
        let coerced = field(FieldKind::Integer, None).coerce(&json!(u64::MAX));
        assert!(matches!(coerced, Err(AppError::InvalidType { .. })));
    }

    #[test]
    fn integer_rejects_numeric_strings() {
        let coerced = field(FieldKind::Integer, None).coerce(&json!("12"));
        assert!(matches!(coerced, Err(AppError::InvalidType { .. })));
    }

    #[test]
    fn null_is_an_invalid_type() {
        let coerced = field(FieldKind::Text, Some(10)).coerce(&json!(null));
        assert!(matches!(coerced, Err(AppError::InvalidType { .. })));
    }

    #[test]
    fn text_keeps_surrounding_whitespace() {
        let coerced = field(FieldKind::Text, Some(10)).coerce(&json!(" W-01 "));
        assert_eq!(coerced.ok().as_ref().and_then(FieldValue::as_text), Some(" W-01 "));
        assert_eq!(FieldValue::Integer(7).as_text(), None);
    }

    #[test]
    fn float_accepts_integers() {
        let coerced = field(FieldKind::Float, None).coerce(&json!(-18));
        assert_eq!(coerced.ok(), Some(FieldValue::Float(-18.0)));
    }

    #[test]
    fn date_parses_iso_calendar_dates() {
        let coerced = field(FieldKind::Date, None).coerce(&json!("2024-02-29"));
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).map(FieldValue::Date);
        assert_eq!(coerced.ok(), expected);
    }

    #[test]
    fn date_rejects_impossible_dates() {
        let coerced = field(FieldKind::Date, None).coerce(&json!("2023-02-29"));
        assert!(matches!(
            coerced,
            Err(AppError::InvalidType {
                expected: "date",
                ..
            })
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let coerced = field(FieldKind::Text, Some(3)).coerce(&json!("äöü"));
        assert!(coerced.is_ok());
    }

    #[test]
    fn whitespace_required_text_is_rejected() {
        let coerced = field(FieldKind::Text, Some(10)).coerce(&json!("   "));
        assert!(matches!(coerced, Err(AppError::EmptyRequiredField { .. })));
    }

    #[test]
    fn optional_text_may_be_empty() {
        let optional = FieldDefinition::new("note", FieldKind::Text, Some(10), false, false)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            optional.coerce(&json!("")).ok(),
            Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn dates_project_back_to_iso_strings() {
        let value = NaiveDate::from_ymd_opt(2021, 4, 4)
            .map(FieldValue::Date)
            .unwrap_or_else(|| unreachable!());
        assert_eq!(value.to_json(), json!("2021-04-04"));
        assert_eq!(value.to_string(), "2021-04-04");
    }
}
