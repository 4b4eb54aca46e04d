//! Forms commands

use super::ApiClient;
use crate::output::{truncate, OutputFormat};
use crate::{script, FormCommands};
use colored::Colorize;
use eventforms::render::{Control, FieldView};
use eventforms::{Form, FormBuilder, FormsError, HttpSubmitter, SubmitterConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;

/// A stored form as returned by the API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub id: String,
    pub event_name: String,
    pub form: Map<String, Value>,
    pub created_at: String,
}

#[derive(Tabled)]
struct DocumentRow {
    id: String,
    event: String,
    values: String,
    created: String,
}

impl From<&FormDocument> for DocumentRow {
    fn from(doc: &FormDocument) -> Self {
        Self {
            id: doc.id.clone(),
            event: doc.event_name.clone(),
            values: truncate(&Value::Object(doc.form.clone()).to_string(), 60),
            created: doc.created_at.clone(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    id: String,
    label: String,
    name: String,
    control: String,
    value: String,
    required: bool,
}

impl From<&FieldView> for FieldRow {
    fn from(view: &FieldView) -> Self {
        let (control, value) = summarize(&view.control);
        Self {
            id: view.id.clone(),
            label: view.label.clone(),
            name: view.name.clone(),
            control,
            value: truncate(&value, 40),
            required: view.required,
        }
    }
}

fn summarize(control: &Control) -> (String, String) {
    match control {
        Control::Input { input_type, value, .. } => (input_type.to_string(), value.clone()),
        Control::TextArea { value, .. } => ("textarea".into(), value.clone()),
        Control::Checkbox { checked } => ("checkbox".into(), checked.to_string()),
        Control::RadioGroup { options } | Control::Select { options } => {
            let kind = if matches!(control, Control::RadioGroup { .. }) { "radio" } else { "select" };
            let selected = options.iter().find(|o| o.selected).map(|o| o.value.clone()).unwrap_or_default();
            (format!("{kind} ({} options)", options.len()), selected)
        }
        Control::File { file_name } => ("file".into(), file_name.clone().unwrap_or_default()),
    }
}

pub async fn handle(action: FormCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    match action {
        FormCommands::List => {
            let forms: Vec<FormDocument> = client.get("/api/form/").await?;
            format.print(forms.as_slice(), |d| DocumentRow::from(d));
        }
        FormCommands::Build { event, script, submit } => build(client, format, &event, &script, submit).await?,
    }
    Ok(())
}

async fn build(client: &ApiClient, format: OutputFormat, event: &str, path: &Path, submit: bool) -> Result<(), String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let ops = script::parse(path, &content)?;

    let mut builder = FormBuilder::new(event, Form::new(|values| tracing::debug!(fields = values.len(), "on-submit")));
    if submit {
        let submitter = HttpSubmitter::new(SubmitterConfig::for_api(&client.base_url)).map_err(|e| e.to_string())?;
        builder = builder.with_submitter(Arc::new(submitter));
    }
    script::apply(&mut builder, &ops)?;

    format.print(builder.render().as_slice(), |v| FieldRow::from(v));
    if !submit {
        return Ok(());
    }

    let submission = builder.submit().map_err(describe)?;
    let Some(delivery) = submission.delivery else {
        return Ok(());
    };
    let receipt = delivery.await.map_err(|e| e.to_string())?.map_err(describe)?;
    println!("{} {} (HTTP {})", "Submitted".green(), event, receipt.status);
    if let Some(id) = receipt.document.get("id").and_then(|id| id.as_str()) {
        println!("Stored as {id}");
    }
    Ok(())
}

fn describe(error: FormsError) -> String {
    match error {
        FormsError::ValidationFailed(violations) => {
            let lines: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
            format!("form has {} validation error(s):\n{}", violations.len(), lines.join("\n"))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventforms::render::ChoiceItem;

    #[test]
    fn test_summarize_controls() {
        let options = vec![
            ChoiceItem { label: "Male".into(), value: "male".into(), selected: true },
            ChoiceItem { label: "Female".into(), value: "female".into(), selected: false },
        ];
        assert_eq!(summarize(&Control::RadioGroup { options }), ("radio (2 options)".into(), "male".into()));
        assert_eq!(summarize(&Control::Checkbox { checked: true }), ("checkbox".into(), "true".into()));
        assert_eq!(summarize(&Control::File { file_name: None }), ("file".into(), String::new()));
    }

    #[test]
    fn test_document_row() {
        let doc: FormDocument = serde_json::from_value(serde_json::json!({
            "id": "6c1f",
            "eventName": "meetup",
            "form": {"age": 31},
            "createdAt": "2026-10-15T12:00:00Z"
        }))
        .unwrap();
        let row = DocumentRow::from(&doc);
        assert_eq!(row.event, "meetup");
        assert_eq!(row.values, r#"{"age":31}"#);
    }
}
