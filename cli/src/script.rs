//! Builder scripts
//!
//! A script is a YAML or JSON list of builder operations replayed against a
//! fresh `FormBuilder`. Fields are addressed by `name` since ids are only
//! known once a draft is committed.
//!
//! ```yaml
//! - op: add_field
//!   kind: radio
//! - op: set
//!   key: label
//!   value: Gender
//! - op: set
//!   key: name
//!   value: gender
//! - op: add_option
//!   label: Male
//!   value: male
//! - op: commit
//! - op: set_value
//!   field: gender
//!   value: male
//! ```

use eventforms::{DraftAttribute, FieldKind, FormBuilder, RuleKey, SettingInput};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuilderOp {
    /// Open a draft for a new field
    AddField { kind: String },
    /// Set a draft attribute (label, name, placeholder, type)
    Set { key: String, value: String },
    AddOption { label: String, value: String },
    RemoveOption { index: usize },
    Commit,
    Cancel,
    Delete { field: String },
    SetValue { field: String, value: Value },
    OpenSettings { field: String },
    /// Set a validation attribute on the staged field. `checked` drives switches.
    SetRule {
        key: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        checked: Option<bool>,
    },
    SaveSettings,
    CancelSettings,
}

/// Parses a script, picking the format from the file extension.
pub fn parse(path: &Path, content: &str) -> Result<Vec<BuilderOp>, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| format!("invalid script: {e}")),
        _ => serde_yaml::from_str(content).map_err(|e| format!("invalid script: {e}")),
    }
}

/// Applies every operation in order, stopping at the first failure.
pub fn apply(builder: &mut FormBuilder, ops: &[BuilderOp]) -> Result<(), String> {
    for (step, op) in ops.iter().enumerate() {
        apply_one(builder, op).map_err(|e| format!("step {} ({}): {e}", step + 1, op.name()))?;
    }
    Ok(())
}

impl BuilderOp {
    fn name(&self) -> &'static str {
        match self {
            Self::AddField { .. } => "add_field",
            Self::Set { .. } => "set",
            Self::AddOption { .. } => "add_option",
            Self::RemoveOption { .. } => "remove_option",
            Self::Commit => "commit",
            Self::Cancel => "cancel",
            Self::Delete { .. } => "delete",
            Self::SetValue { .. } => "set_value",
            Self::OpenSettings { .. } => "open_settings",
            Self::SetRule { .. } => "set_rule",
            Self::SaveSettings => "save_settings",
            Self::CancelSettings => "cancel_settings",
        }
    }
}

fn field_id(builder: &FormBuilder, name: &str) -> Result<String, String> {
    builder
        .form()
        .fields()
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.id.clone())
        .ok_or_else(|| format!("no field named '{name}'"))
}

fn apply_one(builder: &mut FormBuilder, op: &BuilderOp) -> Result<(), String> {
    match op {
        BuilderOp::AddField { kind } => {
            let kind: FieldKind = kind.parse().map_err(|e| format!("{e}"))?;
            builder.add_field_draft(kind);
        }
        BuilderOp::Set { key, value } => {
            let attribute = DraftAttribute::parse(key, value).map_err(|e| e.to_string())?;
            builder.set_draft_attribute(attribute).map_err(|e| e.to_string())?;
        }
        BuilderOp::AddOption { label, value } => {
            if !builder.add_draft_option(label, value).map_err(|e| e.to_string())? {
                tracing::warn!(%label, %value, "option skipped");
            }
        }
        BuilderOp::RemoveOption { index } => {
            builder.remove_draft_option(*index).map_err(|e| e.to_string())?;
        }
        BuilderOp::Commit => {
            let field = builder.commit_draft().map_err(|e| e.to_string())?;
            tracing::debug!(id = %field.id, name = %field.name, "field committed");
        }
        BuilderOp::Cancel => builder.cancel_draft(),
        BuilderOp::Delete { field } => {
            let id = field_id(builder, field)?;
            builder.delete_field(&id);
        }
        BuilderOp::SetValue { field, value } => {
            let id = field_id(builder, field)?;
            builder.set_field_value(&id, value).map_err(|e| e.to_string())?;
        }
        BuilderOp::OpenSettings { field } => {
            let id = field_id(builder, field)?;
            builder.open_field_settings(&id).map_err(|e| e.to_string())?;
        }
        BuilderOp::SetRule { key, value, checked } => {
            let key: RuleKey = key.parse().map_err(|e| format!("{e}"))?;
            let id = builder
                .staged_settings()
                .map(|f| f.id.clone())
                .ok_or("open_settings must come before set_rule")?;
            let input = match checked {
                Some(checked) => SettingInput::Checked(*checked),
                None => SettingInput::Text(value.clone().unwrap_or_default()),
            };
            builder.set_field_validation_attribute(&id, key, input).map_err(|e| e.to_string())?;
        }
        BuilderOp::SaveSettings => {
            builder.save_field_settings().map_err(|e| e.to_string())?;
        }
        BuilderOp::CancelSettings => builder.cancel_field_settings(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventforms::{FieldValue, Form};
    use serde_json::json;

    const SCRIPT: &str = r#"
- op: add_field
  kind: number
- op: set
  key: label
  value: Age
- op: set
  key: name
  value: age
- op: commit
- op: open_settings
  field: age
- op: set_rule
  key: required
  checked: true
- op: set_rule
  key: min
  value: "18"
- op: save_settings
- op: set_value
  field: age
  value: "31"
- op: add_field
  kind: radio
- op: set
  key: label
  value: Gender
- op: set
  key: name
  value: gender
- op: add_option
  label: Male
  value: male
- op: commit
- op: set_value
  field: gender
  value: male
"#;

    fn builder() -> FormBuilder {
        FormBuilder::new("meetup", Form::new(|_| {}))
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let ops = parse(Path::new("ops.yaml"), SCRIPT).unwrap();
        assert_eq!(ops.len(), 15);
        assert_eq!(ops[0], BuilderOp::AddField { kind: "number".into() });

        let ops = parse(Path::new("ops.json"), r#"[{"op": "commit"}, {"op": "remove_option", "index": 2}]"#).unwrap();
        assert_eq!(ops, vec![BuilderOp::Commit, BuilderOp::RemoveOption { index: 2 }]);

        assert!(parse(Path::new("ops.json"), r#"[{"op": "explode"}]"#).is_err());
    }

    #[test]
    fn test_apply_builds_form() {
        let mut b = builder();
        apply(&mut b, &parse(Path::new("ops.yml"), SCRIPT).unwrap()).unwrap();

        let fields = b.form().fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].value(), FieldValue::Number(31.0));
        let rule = fields[0].validation.clone().unwrap();
        assert!(rule.required);
        assert_eq!(rule.min, Some(18.0));

        let values = b.submit().unwrap().values;
        assert_eq!(values["age"], json!(31));
        assert_eq!(values["gender"], json!("male"));
    }

    #[test]
    fn test_apply_reports_failing_step() {
        let ops = vec![
            BuilderOp::AddField { kind: "text".into() },
            BuilderOp::Commit,
        ];
        let err = apply(&mut builder(), &ops).unwrap_err();
        assert!(err.starts_with("step 2 (commit)"), "{err}");

        let err = apply(&mut builder(), &[BuilderOp::Delete { field: "nope".into() }]).unwrap_err();
        assert!(err.contains("no field named 'nope'"));

        let err = apply(&mut builder(), &[BuilderOp::AddField { kind: "slider".into() }]).unwrap_err();
        assert!(err.contains("slider"));
    }
}
