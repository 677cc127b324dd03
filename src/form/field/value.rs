use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value, json};

use crate::domain::{DateMode, FieldKind};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Value a field propagates to the controller, shaped by its declared type:
/// text for text-like fields, numbers for numeric ones, id lists for
/// multi-value fields, dates for date-like fields and files for uploads.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    Date(NaiveDate),
    DateRange {
        from: NaiveDate,
        to: Option<NaiveDate>,
    },
    DateTime(NaiveDateTime),
    Range(Vec<f64>),
    Files(Vec<UploadedFile>),
}

/// A file accepted by an upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime: String,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Range(items) => items.is_empty(),
            FieldValue::Files(files) => files.is_empty(),
            FieldValue::Number(_)
            | FieldValue::Bool(_)
            | FieldValue::Date(_)
            | FieldValue::DateRange { .. }
            | FieldValue::DateTime(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Empty => Value::Null,
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Number(number) => number_value(*number),
            FieldValue::Bool(flag) => Value::Bool(*flag),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Date(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            FieldValue::DateRange { from, to } => {
                let mut map = Map::new();
                map.insert(
                    "from".to_string(),
                    Value::String(from.format(DATE_FORMAT).to_string()),
                );
                map.insert(
                    "to".to_string(),
                    to.map(|to| Value::String(to.format(DATE_FORMAT).to_string()))
                        .unwrap_or(Value::Null),
                );
                Value::Object(map)
            }
            FieldValue::DateTime(moment) => {
                Value::String(moment.format(DATETIME_FORMAT).to_string())
            }
            FieldValue::Range(values) => {
                Value::Array(values.iter().copied().map(number_value).collect())
            }
            FieldValue::Files(files) => Value::Array(
                files
                    .iter()
                    .map(|file| {
                        json!({
                            "name": file.name,
                            "path": file.path.display().to_string(),
                            "size": file.size,
                            "type": file.mime,
                        })
                    })
                    .collect(),
            ),
        }
    }

    /// Interpret a JSON default for a field of `kind`. Values of the wrong
    /// shape become [`FieldValue::Empty`].
    pub fn from_json(kind: &FieldKind, value: &Value) -> Self {
        match kind {
            FieldKind::Input(_)
            | FieldKind::Password(_)
            | FieldKind::Textarea(_)
            | FieldKind::Link(_)
            | FieldKind::Select(_)
            | FieldKind::Radio(_)
            | FieldKind::Combobox(_) => match value {
                Value::String(text) => FieldValue::Text(text.clone()),
                Value::Number(number) => FieldValue::Text(number.to_string()),
                _ => FieldValue::Empty,
            },
            FieldKind::Number(_) => value
                .as_f64()
                .or_else(|| value.as_str().and_then(|text| text.parse().ok()))
                .map(FieldValue::Number)
                .unwrap_or_default(),
            FieldKind::Switch(_) => value.as_bool().map(FieldValue::Bool).unwrap_or_default(),
            FieldKind::MultiSelect(_) | FieldKind::Checkbox(_) | FieldKind::Hierarchical(_) => {
                value
                    .as_array()
                    .map(|items| {
                        FieldValue::List(
                            items
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect(),
                        )
                    })
                    .unwrap_or_default()
            }
            FieldKind::Date(config) => match config.mode {
                DateMode::Single => value
                    .as_str()
                    .and_then(parse_date)
                    .map(FieldValue::Date)
                    .unwrap_or_default(),
                DateMode::Range => {
                    let from = value.get("from").and_then(Value::as_str).and_then(parse_date);
                    let to = value.get("to").and_then(Value::as_str).and_then(parse_date);
                    match from {
                        Some(from) => FieldValue::DateRange { from, to },
                        None => FieldValue::Empty,
                    }
                }
            },
            FieldKind::Datetime(_) => value
                .as_str()
                .and_then(|text| NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).ok())
                .map(FieldValue::DateTime)
                .unwrap_or_default(),
            FieldKind::Slider(_) => match value {
                Value::Number(number) => number
                    .as_f64()
                    .map(|number| FieldValue::Range(vec![number]))
                    .unwrap_or_default(),
                Value::Array(items) => {
                    FieldValue::Range(items.iter().filter_map(Value::as_f64).collect())
                }
                _ => FieldValue::Empty,
            },
            FieldKind::FileUpload(_) => FieldValue::Empty,
        }
    }
}

/// Integral values are written as JSON integers.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < MAX_EXACT_INTEGER {
        return Value::from(number as i64);
    }
    Number::from_f64(number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}
