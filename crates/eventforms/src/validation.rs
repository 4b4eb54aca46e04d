//! Validation rules
//!
//! A [`ValidationRule`] is a passive bag of optional constraints. It only
//! changes through [`ValidationRule::merge`], which replaces one attribute and
//! refuses combinations that can never be satisfied.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::field::{format_number, truthy, FieldInput};
use crate::{FormsError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Names of the individual constraints, as used by the settings editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKey {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
}

impl RuleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pattern => "pattern",
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKey {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "required" => Ok(Self::Required),
            "minLength" | "min_length" => Ok(Self::MinLength),
            "maxLength" | "max_length" => Ok(Self::MaxLength),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "pattern" => Ok(Self::Pattern),
            other => Err(FormsError::InvalidRule(format!("unknown setting '{other}'"))),
        }
    }
}

/// Raw input from a settings control: a switch reports its checked state, a
/// text box its text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingInput {
    Checked(bool),
    Text(String),
}

impl SettingInput {
    /// Mirrors a change event: `checked` is used when the control is a switch.
    pub fn from_event(value: &str, checked: bool, is_checkbox: bool) -> Self {
        if is_checkbox {
            Self::Checked(checked)
        } else {
            Self::Text(value.to_string())
        }
    }
}

/// A single-attribute change to a rule. `None` clears the constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleUpdate {
    Required(bool),
    MinLength(Option<u32>),
    MaxLength(Option<u32>),
    Min(Option<f64>),
    Max(Option<f64>),
    Pattern(Option<String>),
}

impl RuleUpdate {
    pub fn key(&self) -> RuleKey {
        match self {
            Self::Required(_) => RuleKey::Required,
            Self::MinLength(_) => RuleKey::MinLength,
            Self::MaxLength(_) => RuleKey::MaxLength,
            Self::Min(_) => RuleKey::Min,
            Self::Max(_) => RuleKey::Max,
            Self::Pattern(_) => RuleKey::Pattern,
        }
    }

    /// Parses settings-editor input for `key`. Empty text clears the constraint.
    pub fn parse(key: RuleKey, input: SettingInput) -> Result<Self> {
        let text = match input {
            SettingInput::Checked(checked) if key == RuleKey::Required => return Ok(Self::Required(checked)),
            SettingInput::Checked(_) => {
                return Err(FormsError::InvalidRule(format!("{key} is not a switch setting")))
            }
            SettingInput::Text(text) => text,
        };
        let trimmed = text.trim();
        match key {
            RuleKey::Required => Ok(Self::Required(truthy(&Value::String(text.clone())))),
            RuleKey::MinLength => parse_length(key, trimmed).map(Self::MinLength),
            RuleKey::MaxLength => parse_length(key, trimmed).map(Self::MaxLength),
            RuleKey::Min => parse_bound(key, trimmed).map(Self::Min),
            RuleKey::Max => parse_bound(key, trimmed).map(Self::Max),
            RuleKey::Pattern if trimmed.is_empty() => Ok(Self::Pattern(None)),
            RuleKey::Pattern => Ok(Self::Pattern(Some(text))),
        }
    }
}

fn parse_length(key: RuleKey, text: &str) -> Result<Option<u32>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u32>()
        .map(Some)
        .map_err(|_| FormsError::InvalidRule(format!("{key} must be a non-negative integer, got '{text}'")))
}

fn parse_bound(key: RuleKey, text: &str) -> Result<Option<f64>> {
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(FormsError::InvalidRule(format!("{key} must be a number, got '{text}'"))),
    }
}

/// Splits `/body/flags` into the body and the regex inline flags it asks for.
/// Anything not starting with `/` or without a closing `/` is a bare body.
fn split_delimited(pattern: &str) -> Result<(&str, String)> {
    let Some((body, flags)) = pattern.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) else {
        return Ok((pattern, String::new()));
    };
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' if !inline.contains(flag) => inline.push(flag),
            'i' | 'm' | 's' | 'u' => {}
            other => {
                return Err(FormsError::InvalidRule(format!("unsupported pattern flag '{other}' in '{pattern}'")))
            }
        }
    }
    Ok((body, inline))
}

/// One failed constraint on a field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub key: RuleKey,
    pub message: String,
}

impl RuleViolation {
    fn new(key: RuleKey, message: impl Into<String>) -> Self {
        Self { key, message: message.into() }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl ValidationRule {
    pub fn required() -> Self {
        Self { required: true, ..Self::default() }
    }

    /// Returns a copy with one attribute replaced.
    ///
    /// Fails without touching `self` when the result would have
    /// `minLength > maxLength`, `min > max`, or an uncompilable pattern.
    pub fn merge(&self, update: RuleUpdate) -> Result<Self> {
        let mut next = self.clone();
        match update {
            RuleUpdate::Required(required) => next.required = required,
            RuleUpdate::MinLength(n) => next.min_length = n,
            RuleUpdate::MaxLength(n) => next.max_length = n,
            RuleUpdate::Min(n) => next.min = n,
            RuleUpdate::Max(n) => next.max = n,
            RuleUpdate::Pattern(p) => next.pattern = p,
        }
        next.check_consistency()?;
        Ok(next)
    }

    fn check_consistency(&self) -> Result<()> {
        if let (Some(lo), Some(hi)) = (self.min_length, self.max_length) {
            if lo > hi {
                return Err(FormsError::InvalidRule(format!("minLength {lo} exceeds maxLength {hi}")));
            }
        }
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(FormsError::InvalidRule(format!(
                    "min {} exceeds max {}",
                    format_number(lo),
                    format_number(hi)
                )));
            }
        }
        if self.pattern.is_some() {
            self.compiled_pattern()?;
        }
        Ok(())
    }

    /// Compiles the pattern anchored to the whole value.
    ///
    /// A pattern written as `/expr/flags` is unwrapped first. The `i`, `m` and
    /// `s` flags become inline flags, `u` is implied; any other flag is refused.
    pub fn compiled_pattern(&self) -> Result<Option<Regex>> {
        let Some(pattern) = self.pattern.as_deref() else {
            return Ok(None);
        };
        let (body, flags) = split_delimited(pattern)?;
        let group = if flags.is_empty() { "?:".to_string() } else { format!("?{flags}:") };
        Regex::new(&format!("^({group}{body})$"))
            .map(Some)
            .map_err(|e| FormsError::InvalidRule(format!("invalid pattern '{pattern}': {e}")))
    }

    /// Checks a field's current value against every constraint.
    ///
    /// Length and pattern constraints skip empty text; `required` is the only
    /// constraint that rejects an empty value.
    pub fn check(&self, input: &FieldInput) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        if self.required && input.is_blank() {
            violations.push(RuleViolation::new(RuleKey::Required, "a value is required"));
        }

        match input {
            FieldInput::Text { value }
            | FieldInput::Email { value }
            | FieldInput::Password { value }
            | FieldInput::TextArea { value } => {
                if !value.is_empty() {
                    self.check_length(value, &mut violations);
                    self.check_pattern(value, &mut violations);
                }
            }
            FieldInput::Number { value } => {
                if let Some(min) = self.min.filter(|min| value < min) {
                    let message = format!("must be at least {}", format_number(min));
                    violations.push(RuleViolation::new(RuleKey::Min, message));
                }
                if let Some(max) = self.max.filter(|max| value > max) {
                    let message = format!("must be at most {}", format_number(max));
                    violations.push(RuleViolation::new(RuleKey::Max, message));
                }
            }
            FieldInput::Select { .. }
            | FieldInput::Radio { .. }
            | FieldInput::Checkbox { .. }
            | FieldInput::Date { .. }
            | FieldInput::File { .. } => {}
        }

        violations
    }

    fn check_length(&self, value: &str, violations: &mut Vec<RuleViolation>) {
        let len = value.chars().count();
        if let Some(min) = self.min_length.filter(|&min| len < min as usize) {
            violations.push(RuleViolation::new(RuleKey::MinLength, format!("must be at least {min} characters")));
        }
        if let Some(max) = self.max_length.filter(|&max| len > max as usize) {
            violations.push(RuleViolation::new(RuleKey::MaxLength, format!("must be at most {max} characters")));
        }
    }

    fn check_pattern(&self, value: &str, violations: &mut Vec<RuleViolation>) {
        match self.compiled_pattern() {
            Ok(Some(re)) if !re.is_match(value) => {
                violations.push(RuleViolation::new(RuleKey::Pattern, "does not match the required format"));
            }
            Ok(_) => {}
            Err(e) => violations.push(RuleViolation::new(RuleKey::Pattern, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_one_attribute() {
        let rule = ValidationRule { required: true, max_length: Some(10), ..Default::default() };
        let merged = rule.merge(RuleUpdate::MinLength(Some(2))).unwrap();
        assert!(merged.required);
        assert_eq!(merged.min_length, Some(2));
        assert_eq!(merged.max_length, Some(10));
        assert_eq!(rule.min_length, None);
    }

    #[test]
    fn test_merge_rejects_inverted_bounds() {
        let rule = ValidationRule { max: Some(5.0), max_length: Some(3), ..Default::default() };
        assert!(matches!(rule.merge(RuleUpdate::Min(Some(6.0))), Err(FormsError::InvalidRule(_))));
        assert!(matches!(rule.merge(RuleUpdate::MinLength(Some(4))), Err(FormsError::InvalidRule(_))));
        assert!(rule.merge(RuleUpdate::Min(Some(5.0))).is_ok());
    }

    #[test]
    fn test_merge_rejects_bad_pattern() {
        let rule = ValidationRule::default();
        assert!(rule.merge(RuleUpdate::Pattern(Some("([a-z".into()))).is_err());
        assert!(rule.merge(RuleUpdate::Pattern(Some("/^[a-z]+$/".into()))).is_ok());
        assert!(matches!(
            rule.merge(RuleUpdate::Pattern(Some("/abc/g".into()))),
            Err(FormsError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_delimited_pattern_flags() {
        let rule = ValidationRule::default().merge(RuleUpdate::Pattern(Some("/abc/i".into()))).unwrap();
        for value in ["abc", "ABC"] {
            assert!(rule.check(&FieldInput::Email { value: value.into() }).is_empty(), "{value}");
        }
        assert_eq!(rule.check(&FieldInput::Email { value: "abd".into() })[0].key, RuleKey::Pattern);

        let plain = ValidationRule { pattern: Some("/a/b/".into()), ..Default::default() };
        assert!(plain.check(&FieldInput::Text { value: "a/b".into() }).is_empty());
    }

    #[test]
    fn test_parse_setting_inputs() {
        assert_eq!(
            RuleUpdate::parse(RuleKey::Required, SettingInput::Checked(true)).unwrap(),
            RuleUpdate::Required(true)
        );
        assert_eq!(
            RuleUpdate::parse(RuleKey::MaxLength, SettingInput::Text("12".into())).unwrap(),
            RuleUpdate::MaxLength(Some(12))
        );
        assert_eq!(RuleUpdate::parse(RuleKey::Min, SettingInput::Text(" ".into())).unwrap(), RuleUpdate::Min(None));
        assert!(RuleUpdate::parse(RuleKey::MinLength, SettingInput::Text("-1".into())).is_err());
        assert!(RuleUpdate::parse(RuleKey::Max, SettingInput::Checked(true)).is_err());
        assert_eq!("minLength".parse::<RuleKey>().unwrap(), RuleKey::MinLength);
    }

    #[test]
    fn test_check_text_constraints() {
        let rule = ValidationRule {
            required: true,
            min_length: Some(3),
            pattern: Some("[a-z]+".into()),
            ..Default::default()
        };
        let blank = FieldInput::Text { value: String::new() };
        assert_eq!(rule.check(&blank).len(), 1);

        let short = FieldInput::Text { value: "ab".into() };
        let keys: Vec<_> = rule.check(&short).into_iter().map(|v| v.key).collect();
        assert_eq!(keys, vec![RuleKey::MinLength]);

        let wrong = FieldInput::Text { value: "abc1".into() };
        assert_eq!(rule.check(&wrong)[0].key, RuleKey::Pattern);

        assert!(rule.check(&FieldInput::Text { value: "abcd".into() }).is_empty());
    }

    #[test]
    fn test_check_number_bounds() {
        let rule = ValidationRule { min: Some(18.0), max: Some(99.0), ..Default::default() };
        assert_eq!(rule.check(&FieldInput::Number { value: 17.0 })[0].key, RuleKey::Min);
        assert_eq!(rule.check(&FieldInput::Number { value: 100.0 })[0].key, RuleKey::Max);
        assert!(rule.check(&FieldInput::Number { value: 30.0 }).is_empty());
    }

    #[test]
    fn test_required_checkbox_must_be_checked() {
        let rule = ValidationRule::required();
        assert_eq!(rule.check(&FieldInput::Checkbox { value: false, options: None }).len(), 1);
        assert!(rule.check(&FieldInput::Checkbox { value: true, options: None }).is_empty());
    }
}
