//! Render descriptors
//!
//! Describes, per field kind, which control a UI draws for a field and which
//! settings its editor exposes. Drawing itself is left to the UI toolkit.

use serde::Serialize;

use crate::field::{format_number, Field, FieldInput, FieldKind, FormOption};
use crate::validation::{RuleKey, ValidationRule};

// =============================================================================
// Field controls
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl InputConstraints {
    fn text(rule: &ValidationRule, with_pattern: bool) -> Self {
        Self {
            min_length: rule.min_length,
            max_length: rule.max_length,
            pattern: if with_pattern { rule.pattern.clone() } else { None },
            ..Self::default()
        }
    }

    fn numeric(rule: &ValidationRule) -> Self {
        Self { min: rule.min, max: rule.max, ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum Control {
    #[serde(rename_all = "camelCase")]
    Input { input_type: &'static str, value: String, constraints: InputConstraints },
    #[serde(rename_all = "camelCase")]
    TextArea { value: String, rows: u8, constraints: InputConstraints },
    Checkbox { checked: bool },
    RadioGroup { options: Vec<ChoiceItem> },
    Select { options: Vec<ChoiceItem> },
    #[serde(rename_all = "camelCase")]
    File { file_name: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub name: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub control: Control,
}

pub const TEXTAREA_ROWS: u8 = 4;

/// Describes the control for a field. One arm per kind.
pub fn describe(field: &Field) -> FieldView {
    let rule = field.validation.clone().unwrap_or_default();
    let control = match field.input() {
        FieldInput::Text { value } => Control::Input {
            input_type: "text",
            value: value.clone(),
            constraints: InputConstraints::text(&rule, true),
        },
        FieldInput::Email { value } => Control::Input {
            input_type: "email",
            value: value.clone(),
            constraints: InputConstraints::text(&rule, true),
        },
        FieldInput::Password { value } => Control::Input {
            input_type: "password",
            value: value.clone(),
            constraints: InputConstraints::text(&rule, true),
        },
        FieldInput::Number { value } => Control::Input {
            input_type: "number",
            value: format_number(*value),
            constraints: InputConstraints::numeric(&rule),
        },
        FieldInput::TextArea { value } => Control::TextArea {
            value: value.clone(),
            rows: TEXTAREA_ROWS,
            constraints: InputConstraints::text(&rule, false),
        },
        FieldInput::Date { value } => Control::Input {
            input_type: "date",
            value: value.clone(),
            constraints: InputConstraints::default(),
        },
        FieldInput::Checkbox { value, .. } => Control::Checkbox { checked: *value },
        FieldInput::Radio { options, value } => {
            Control::RadioGroup { options: choice_items(options, &value.as_text()) }
        }
        FieldInput::Select { options, value } => Control::Select { options: choice_items(options, &value.as_text()) },
        FieldInput::File { value } => Control::File { file_name: value.as_ref().map(|f| f.name.clone()) },
    };

    FieldView {
        id: field.id.clone(),
        label: field.label.clone(),
        name: field.name.clone(),
        placeholder: field.placeholder.clone(),
        required: rule.required,
        disabled: field.disabled,
        readonly: field.readonly,
        control,
    }
}

fn choice_items(options: &[FormOption], selected: &str) -> Vec<ChoiceItem> {
    options
        .iter()
        .map(|option| {
            let value = option.value.as_text();
            ChoiceItem { label: option.label.clone(), selected: !selected.is_empty() && value == selected, value }
        })
        .collect()
}

// =============================================================================
// Settings editor
// =============================================================================

const COMMON: &[RuleKey] = &[RuleKey::Required, RuleKey::MinLength, RuleKey::MaxLength];
const NUMBER: &[RuleKey] = &[RuleKey::Required, RuleKey::MinLength, RuleKey::MaxLength, RuleKey::Min, RuleKey::Max];
const EMAIL: &[RuleKey] = &[RuleKey::Required, RuleKey::MinLength, RuleKey::MaxLength, RuleKey::Pattern];
const REQUIRED_ONLY: &[RuleKey] = &[RuleKey::Required];

/// Settings the editor exposes for a kind.
pub fn settings_keys(kind: FieldKind) -> &'static [RuleKey] {
    match kind {
        FieldKind::Number => NUMBER,
        FieldKind::Email => EMAIL,
        FieldKind::Checkbox => REQUIRED_ONLY,
        FieldKind::File => REQUIRED_ONLY,
        FieldKind::Text
        | FieldKind::Password
        | FieldKind::TextArea
        | FieldKind::Select
        | FieldKind::Radio
        | FieldKind::Date => COMMON,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingControl {
    Switch,
    Number,
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingView {
    pub key: RuleKey,
    pub label: &'static str,
    pub control: SettingControl,
    pub checked: bool,
    pub value: String,
}

/// Settings-editor controls for a field, filled with its current rule.
pub fn settings_editor(field: &Field) -> Vec<SettingView> {
    let rule = field.validation.clone().unwrap_or_default();
    settings_keys(field.kind())
        .iter()
        .map(|&key| {
            let (label, control, value) = match key {
                RuleKey::Required => ("Required", SettingControl::Switch, String::new()),
                RuleKey::MinLength => ("Min Length", SettingControl::Number, opt_text(rule.min_length.map(f64::from))),
                RuleKey::MaxLength => ("Max Length", SettingControl::Number, opt_text(rule.max_length.map(f64::from))),
                RuleKey::Min => ("Min Value", SettingControl::Number, opt_text(rule.min)),
                RuleKey::Max => ("Max Value", SettingControl::Number, opt_text(rule.max)),
                RuleKey::Pattern => ("Email Pattern", SettingControl::Text, rule.pattern.clone().unwrap_or_default()),
            };
            SettingView { key, label, control, checked: key == RuleKey::Required && rule.required, value }
        })
        .collect()
}

fn opt_text(n: Option<f64>) -> String {
    n.map(format_number).unwrap_or_default()
}
