//! Field value model
//!
//! A [`Field`] is a set of common attributes plus a [`FieldInput`], the tagged
//! union that decides which value type and which extra attributes a field
//! carries. The tag is fixed at construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationRule;
use crate::{FormsError, Result};

// =============================================================================
// Kinds
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Password,
    TextArea,
    Select,
    Radio,
    Checkbox,
    Date,
    File,
}

impl FieldKind {
    pub const ALL: [FieldKind; 10] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::TextArea,
        FieldKind::Select,
        FieldKind::Radio,
        FieldKind::Checkbox,
        FieldKind::Date,
        FieldKind::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Password => "password",
            Self::TextArea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::File => "file",
        }
    }

    /// Kinds whose value must be one of an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| FormsError::InvalidFieldKind(s.to_string()))
    }
}

// =============================================================================
// Options and values
// =============================================================================

/// Value of a select/radio option as stored on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Text form used to match raw input against the option.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormOption {
    pub label: String,
    pub value: OptionValue,
}

impl FormOption {
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

/// Current value of a select or radio field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Number(f64),
    Text(String),
}

impl ChoiceValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

impl Default for ChoiceValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Reference to uploaded content. The bytes themselves never enter the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), content_type: None, size: None }
    }
}

/// A value after coercion, ready to be stored in a field of matching kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Choice(ChoiceValue),
    File(Option<FileRef>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => number_to_json(*n),
            Self::Bool(b) => Value::Bool(*b),
            Self::Choice(ChoiceValue::Number(n)) => number_to_json(*n),
            Self::Choice(ChoiceValue::Text(s)) => Value::String(s.clone()),
            Self::File(None) => Value::Null,
            Self::File(Some(file)) => {
                let mut map = serde_json::Map::new();
                map.insert("name".into(), Value::String(file.name.clone()));
                if let Some(content_type) = &file.content_type {
                    map.insert("contentType".into(), Value::String(content_type.clone()));
                }
                if let Some(size) = file.size {
                    map.insert("size".into(), Value::from(size));
                }
                Value::Object(map)
            }
        }
    }
}

// =============================================================================
// Field input (tagged union)
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldInput {
    Text {
        #[serde(default)]
        value: String,
    },
    Number {
        #[serde(default)]
        value: f64,
    },
    Email {
        #[serde(default)]
        value: String,
    },
    Password {
        #[serde(default)]
        value: String,
    },
    TextArea {
        #[serde(default)]
        value: String,
    },
    Select {
        options: Vec<FormOption>,
        #[serde(default)]
        value: ChoiceValue,
    },
    Radio {
        options: Vec<FormOption>,
        #[serde(default)]
        value: ChoiceValue,
    },
    Checkbox {
        #[serde(default)]
        value: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<Vec<FormOption>>,
    },
    Date {
        #[serde(default)]
        value: String,
    },
    File {
        #[serde(default)]
        value: Option<FileRef>,
    },
}

impl FieldInput {
    /// Default input for a kind. `options` is only kept by select and radio.
    pub fn default_for(kind: FieldKind, options: Vec<FormOption>) -> Self {
        match kind {
            FieldKind::Text => Self::Text { value: String::new() },
            FieldKind::Number => Self::Number { value: 0.0 },
            FieldKind::Email => Self::Email { value: String::new() },
            FieldKind::Password => Self::Password { value: String::new() },
            FieldKind::TextArea => Self::TextArea { value: String::new() },
            FieldKind::Select => Self::Select { options, value: ChoiceValue::default() },
            FieldKind::Radio => Self::Radio { options, value: ChoiceValue::default() },
            FieldKind::Checkbox => Self::Checkbox { value: false, options: None },
            FieldKind::Date => Self::Date { value: String::new() },
            FieldKind::File => Self::File { value: None },
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text { .. } => FieldKind::Text,
            Self::Number { .. } => FieldKind::Number,
            Self::Email { .. } => FieldKind::Email,
            Self::Password { .. } => FieldKind::Password,
            Self::TextArea { .. } => FieldKind::TextArea,
            Self::Select { .. } => FieldKind::Select,
            Self::Radio { .. } => FieldKind::Radio,
            Self::Checkbox { .. } => FieldKind::Checkbox,
            Self::Date { .. } => FieldKind::Date,
            Self::File { .. } => FieldKind::File,
        }
    }

    pub fn value(&self) -> FieldValue {
        match self {
            Self::Text { value }
            | Self::Email { value }
            | Self::Password { value }
            | Self::TextArea { value }
            | Self::Date { value } => FieldValue::Text(value.clone()),
            Self::Number { value } => FieldValue::Number(*value),
            Self::Select { value, .. } | Self::Radio { value, .. } => FieldValue::Choice(value.clone()),
            Self::Checkbox { value, .. } => FieldValue::Bool(*value),
            Self::File { value } => FieldValue::File(value.clone()),
        }
    }

    /// Options of a select/radio field, or carried checkbox options.
    pub fn options(&self) -> &[FormOption] {
        match self {
            Self::Select { options, .. } | Self::Radio { options, .. } => options,
            Self::Checkbox { options: Some(options), .. } => options,
            Self::Checkbox { options: None, .. }
            | Self::Text { .. }
            | Self::Number { .. }
            | Self::Email { .. }
            | Self::Password { .. }
            | Self::TextArea { .. }
            | Self::Date { .. }
            | Self::File { .. } => &[],
        }
    }

    /// Text content for kinds that hold a string value.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { value }
            | Self::Email { value }
            | Self::Password { value }
            | Self::TextArea { value }
            | Self::Date { value } => Some(value),
            Self::Number { .. }
            | Self::Select { .. }
            | Self::Radio { .. }
            | Self::Checkbox { .. }
            | Self::File { .. } => None,
        }
    }

    /// Whether the field holds nothing the user entered.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text { value }
            | Self::Email { value }
            | Self::Password { value }
            | Self::TextArea { value }
            | Self::Date { value } => value.is_empty(),
            Self::Number { value } => value.is_nan(),
            Self::Select { value, .. } | Self::Radio { value, .. } => value.is_empty(),
            Self::Checkbox { value, .. } => !value,
            Self::File { value } => value.is_none(),
        }
    }
}

// =============================================================================
// Field
// =============================================================================

/// Attributes captured when a field is created.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldBase {
    pub label: String,
    pub name: String,
    pub placeholder: Option<String>,
}

impl FieldBase {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self { label: label.into(), name: name.into(), placeholder: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(flatten)]
    input: FieldInput,
}

impl Field {
    /// Builds a field with the kind's default value and a `required: false` rule.
    pub fn new(id: impl Into<String>, kind: FieldKind, base: FieldBase, options: Vec<FormOption>) -> Self {
        let placeholder = base.placeholder.or_else(|| Some(base.name.clone()));
        Self {
            id: id.into(),
            label: base.label,
            name: base.name,
            placeholder,
            validation: Some(ValidationRule::default()),
            disabled: false,
            readonly: false,
            input: FieldInput::default_for(kind, options),
        }
    }

    /// Like [`Field::new`] for a kind given by its wire name.
    pub fn from_kind_name(
        id: impl Into<String>,
        kind: &str,
        base: FieldBase,
        options: Vec<FormOption>,
    ) -> Result<Self> {
        let kind = kind.parse::<FieldKind>()?;
        Ok(Self::new(id, kind, base, options))
    }

    pub fn kind(&self) -> FieldKind {
        self.input.kind()
    }

    pub fn input(&self) -> &FieldInput {
        &self.input
    }

    pub fn value(&self) -> FieldValue {
        self.input.value()
    }

    pub fn options(&self) -> &[FormOption] {
        self.input.options()
    }

    pub fn is_required(&self) -> bool {
        self.validation.as_ref().is_some_and(|rule| rule.required)
    }

    /// Converts raw UI input into a value this field can hold.
    pub fn coerce(&self, raw: &Value) -> Result<FieldValue> {
        let coerced = match &self.input {
            FieldInput::Text { .. }
            | FieldInput::Email { .. }
            | FieldInput::Password { .. }
            | FieldInput::TextArea { .. } => coerce_text(raw).map(FieldValue::Text),
            FieldInput::Date { .. } => coerce_date(raw).map(FieldValue::Text),
            FieldInput::Number { .. } => coerce_number(raw).map(FieldValue::Number),
            FieldInput::Checkbox { .. } => Ok(FieldValue::Bool(truthy(raw))),
            FieldInput::Select { options, .. } | FieldInput::Radio { options, .. } => {
                coerce_choice(raw, options).map(FieldValue::Choice)
            }
            FieldInput::File { .. } => coerce_file(raw).map(FieldValue::File),
        };
        coerced.map_err(|reason| FormsError::ValueCoercion { field_id: self.id.clone(), reason })
    }

    /// Stores an already coerced value. The value must match the field's kind.
    pub fn assign(&mut self, new_value: FieldValue) -> Result<()> {
        let kind = self.kind();
        match (&mut self.input, new_value) {
            (
                FieldInput::Text { value }
                | FieldInput::Email { value }
                | FieldInput::Password { value }
                | FieldInput::TextArea { value }
                | FieldInput::Date { value },
                FieldValue::Text(text),
            ) => *value = text,
            (FieldInput::Number { value }, FieldValue::Number(n)) if n.is_finite() => *value = n,
            (FieldInput::Checkbox { value, .. }, FieldValue::Bool(b)) => *value = b,
            (FieldInput::Select { value, .. } | FieldInput::Radio { value, .. }, FieldValue::Choice(choice)) => {
                *value = choice
            }
            (FieldInput::File { value }, FieldValue::File(file)) => *value = file,
            (_, other) => {
                return Err(FormsError::ValueCoercion {
                    field_id: self.id.clone(),
                    reason: format!("{other:?} does not fit a {kind} field"),
                })
            }
        }
        Ok(())
    }
}

// =============================================================================
// Coercion helpers
// =============================================================================

fn coerce_text(raw: &Value) -> std::result::Result<String, String> {
    match raw {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected text, got {other}")),
    }
}

fn coerce_date(raw: &Value) -> std::result::Result<String, String> {
    let text = coerce_text(raw)?;
    if text.is_empty() {
        return Ok(text);
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("'{text}' is not a YYYY-MM-DD date: {e}"))
}

fn coerce_number(raw: &Value) -> std::result::Result<f64, String> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(format!("{raw} is not a number")),
    }
}

/// Boolean coercion for checkbox input. Text such as "false" or "off" is falsy.
pub(crate) fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "off" | "no"
        ),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_choice(raw: &Value, options: &[FormOption]) -> std::result::Result<ChoiceValue, String> {
    let wanted = match raw {
        Value::Null => return Ok(ChoiceValue::default()),
        Value::String(s) if s.is_empty() => return Ok(ChoiceValue::default()),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        other => return Err(format!("expected an option value, got {other}")),
    };
    options
        .iter()
        .find(|option| option.value.as_text() == wanted)
        .map(|option| match &option.value {
            OptionValue::Number(n) => ChoiceValue::Number(*n),
            OptionValue::Text(s) => ChoiceValue::Text(s.clone()),
            OptionValue::Bool(b) => ChoiceValue::Text(b.to_string()),
        })
        .ok_or_else(|| format!("'{wanted}' is not one of the field's options"))
}

fn coerce_file(raw: &Value) -> std::result::Result<Option<FileRef>, String> {
    match raw {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(FileRef::named(s.clone()))),
        Value::Object(_) => serde_json::from_value::<FileRef>(raw.clone())
            .map(Some)
            .map_err(|e| format!("invalid file reference: {e}")),
        other => Err(format!("expected a file reference, got {other}")),
    }
}

/// Integral numbers become JSON integers so `30` stays `30`, not `30.0`.
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(kind: FieldKind) -> Field {
        Field::new("field-1", kind, FieldBase::new("Label", "name"), vec![])
    }

    #[test]
    fn test_default_values_per_kind() {
        for kind in FieldKind::ALL {
            let f = field(kind);
            assert_eq!(f.kind(), kind);
            assert_eq!(f.validation, Some(ValidationRule::default()));
            let expected = match kind {
                FieldKind::Number => FieldValue::Number(0.0),
                FieldKind::Checkbox => FieldValue::Bool(false),
                FieldKind::File => FieldValue::File(None),
                FieldKind::Select | FieldKind::Radio => FieldValue::Choice(ChoiceValue::default()),
                FieldKind::Text
                | FieldKind::Email
                | FieldKind::Password
                | FieldKind::TextArea
                | FieldKind::Date => FieldValue::Text(String::new()),
            };
            assert_eq!(f.value(), expected, "{kind}");
        }
    }

    #[test]
    fn test_placeholder_defaults_to_name() {
        assert_eq!(field(FieldKind::Text).placeholder.as_deref(), Some("name"));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Field::from_kind_name("f", "slider", FieldBase::new("L", "n"), vec![]).unwrap_err();
        assert_eq!(err, FormsError::InvalidFieldKind("slider".into()));
        assert_eq!("TextArea".parse::<FieldKind>().unwrap(), FieldKind::TextArea);
    }

    #[test]
    fn test_options_only_kept_for_choice_kinds() {
        let options = vec![FormOption::new("A", "a")];
        let select = Field::new("s", FieldKind::Select, FieldBase::new("S", "s"), options.clone());
        assert_eq!(select.options(), options.as_slice());
        let text = Field::new("t", FieldKind::Text, FieldBase::new("T", "t"), options);
        assert!(text.options().is_empty());
    }

    #[test]
    fn test_number_coercion() {
        let f = field(FieldKind::Number);
        assert_eq!(f.coerce(&json!("42")).unwrap(), FieldValue::Number(42.0));
        assert_eq!(f.coerce(&json!(2.5)).unwrap(), FieldValue::Number(2.5));
        assert!(matches!(f.coerce(&json!("abc")), Err(FormsError::ValueCoercion { .. })));
        assert!(f.coerce(&json!("")).is_err());
    }

    #[test]
    fn test_checkbox_truthiness() {
        let f = field(FieldKind::Checkbox);
        for raw in [json!(true), json!(1), json!("yes"), json!("on")] {
            assert_eq!(f.coerce(&raw).unwrap(), FieldValue::Bool(true), "{raw}");
        }
        for raw in [json!(false), json!(0), json!(""), json!(null), json!("false"), json!("off")] {
            assert_eq!(f.coerce(&raw).unwrap(), FieldValue::Bool(false), "{raw}");
        }
    }

    #[test]
    fn test_choice_must_match_an_option() {
        let f = Field::new(
            "g",
            FieldKind::Select,
            FieldBase::new("Gender", "gender"),
            vec![FormOption::new("Male", "male"), FormOption::new("Female", "female")],
        );
        assert_eq!(f.coerce(&json!("male")).unwrap(), FieldValue::Choice(ChoiceValue::Text("male".into())));
        assert_eq!(f.coerce(&json!("")).unwrap(), FieldValue::Choice(ChoiceValue::default()));
        assert!(f.coerce(&json!("other")).is_err());
    }

    #[test]
    fn test_numeric_option_keeps_number_type() {
        let f = Field::new("r", FieldKind::Radio, FieldBase::new("R", "r"), vec![FormOption::new("One", 1.0)]);
        assert_eq!(f.coerce(&json!("1")).unwrap(), FieldValue::Choice(ChoiceValue::Number(1.0)));
        assert_eq!(f.coerce(&json!(1)).unwrap(), FieldValue::Choice(ChoiceValue::Number(1.0)));
    }

    #[test]
    fn test_date_and_file_coercion() {
        let date = field(FieldKind::Date);
        assert_eq!(date.coerce(&json!("2024-02-29")).unwrap(), FieldValue::Text("2024-02-29".into()));
        assert!(date.coerce(&json!("2023-02-29")).is_err());

        let file = field(FieldKind::File);
        assert_eq!(file.coerce(&json!(null)).unwrap(), FieldValue::File(None));
        assert_eq!(
            file.coerce(&json!({"name": "cv.pdf", "size": 10})).unwrap(),
            FieldValue::File(Some(FileRef { name: "cv.pdf".into(), content_type: None, size: Some(10) }))
        );
    }

    #[test]
    fn test_assign_rejects_mismatched_value() {
        let mut f = field(FieldKind::Number);
        assert!(f.assign(FieldValue::Text("x".into())).is_err());
        f.assign(FieldValue::Number(7.0)).unwrap();
        assert_eq!(f.value(), FieldValue::Number(7.0));
    }

    #[test]
    fn test_wire_shape() {
        let options = vec![FormOption::new("S", "s")];
        let f = Field::new("field-9", FieldKind::Radio, FieldBase::new("Size", "size"), options);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "radio");
        assert_eq!(json["options"][0]["value"], "s");
        assert_eq!(json["validation"]["required"], false);

        let back: Field = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(FieldValue::Number(31.0).to_json(), json!(31));
        assert_eq!(FieldValue::Number(1.5).to_json(), json!(1.5));
    }
}
