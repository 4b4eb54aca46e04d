//! Interactive form builder
//!
//! [`FormBuilder`] owns a [`Form`] together with the editor state around it:
//! the draft of a field being added, the staged copy of a field whose
//! settings are being edited, and the in-flight guard for submission.
//! Every operation runs to completion before the next one starts.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::field::{Field, FieldBase, FieldKind, FieldValue, FormOption, OptionValue};
use crate::form::Form;
use crate::render::{self, FieldView, SettingView};
use crate::submission::SubmissionMap;
use crate::transport::{FormSubmitter, SubmissionReceipt, SubmitRequest};
use crate::validation::{RuleKey, RuleUpdate, SettingInput, ValidationRule};
use crate::{FormsError, Result};

pub type SettledCallback = Arc<dyn Fn(&Result<SubmissionReceipt>) + Send + Sync>;

// =============================================================================
// Draft
// =============================================================================

/// A field under construction, not yet part of the form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDraft {
    pub label: String,
    pub name: String,
    pub placeholder: Option<String>,
    pub kind: FieldKind,
    pub options: Vec<FormOption>,
}

impl FieldDraft {
    pub fn new(kind: FieldKind) -> Self {
        Self { label: String::new(), name: String::new(), placeholder: None, kind, options: Vec::new() }
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.label.is_empty() {
            missing.push("label");
        }
        if self.name.is_empty() {
            missing.push("name");
        }
        missing
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DraftAttribute {
    Label(String),
    Name(String),
    Placeholder(Option<String>),
    Kind(FieldKind),
}

impl DraftAttribute {
    /// Parses a `(key, value)` pair from the add-field dialog.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        match key {
            "label" => Ok(Self::Label(value.to_string())),
            "name" => Ok(Self::Name(value.to_string())),
            "placeholder" if value.is_empty() => Ok(Self::Placeholder(None)),
            "placeholder" => Ok(Self::Placeholder(Some(value.to_string()))),
            "type" | "kind" => value.parse().map(Self::Kind),
            other => Err(FormsError::UnknownAttribute(other.to_string())),
        }
    }
}

// =============================================================================
// Ids
// =============================================================================

/// Hands out `field-<millis>` ids, strictly increasing and never already in
/// the form.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next(&mut self, form: &Form) -> String {
        let mut token = Utc::now().timestamp_millis().max(self.last + 1);
        while form.contains(&format!("field-{token}")) {
            token += 1;
        }
        self.last = token;
        format!("field-{token}")
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Result of a successful `submit`: the values handed to on-submit and, when
/// a submitter is configured, the task delivering them.
#[derive(Debug)]
pub struct Submission {
    pub values: SubmissionMap,
    pub delivery: Option<JoinHandle<Result<SubmissionReceipt>>>,
}

/// Clears the in-flight flag when the delivery task ends, even on panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Builder
// =============================================================================

pub struct FormBuilder {
    form: Form,
    event_name: String,
    draft: Option<FieldDraft>,
    staged: Option<Field>,
    ids: IdGenerator,
    submitter: Option<Arc<dyn FormSubmitter>>,
    on_settled: Option<SettledCallback>,
    in_flight: Arc<AtomicBool>,
}

impl FormBuilder {
    pub fn new(event_name: impl Into<String>, form: Form) -> Self {
        Self {
            form,
            event_name: event_name.into(),
            draft: None,
            staged: None,
            ids: IdGenerator::default(),
            submitter: None,
            on_settled: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Forwards every submission to `submitter` on a background task.
    pub fn with_submitter(mut self, submitter: Arc<dyn FormSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Called from the delivery task once a forwarded submission settles.
    pub fn on_settled(mut self, callback: impl Fn(&Result<SubmissionReceipt>) + Send + Sync + 'static) -> Self {
        self.on_settled = Some(Arc::new(callback));
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn render(&self) -> Vec<FieldView> {
        self.form.fields().iter().map(render::describe).collect()
    }

    // -------------------------------------------------------------------------
    // Draft lifecycle
    // -------------------------------------------------------------------------

    /// Opens a fresh draft of `kind`, replacing any open draft.
    pub fn add_field_draft(&mut self, kind: FieldKind) -> &FieldDraft {
        self.draft.insert(FieldDraft::new(kind))
    }

    pub fn draft(&self) -> Option<&FieldDraft> {
        self.draft.as_ref()
    }

    pub fn set_draft_attribute(&mut self, attribute: DraftAttribute) -> Result<&FieldDraft> {
        let draft = self.draft.as_mut().ok_or(FormsError::NoDraft)?;
        match attribute {
            DraftAttribute::Label(label) => draft.label = label,
            DraftAttribute::Name(name) => draft.name = name,
            DraftAttribute::Placeholder(placeholder) => draft.placeholder = placeholder,
            DraftAttribute::Kind(kind) => draft.kind = kind,
        }
        Ok(&*draft)
    }

    /// Appends an option to a select/radio draft. Returns `false` without
    /// changing anything when label or value is empty or the kind has no options.
    pub fn add_draft_option(&mut self, label: &str, value: &str) -> Result<bool> {
        let draft = self.draft.as_mut().ok_or(FormsError::NoDraft)?;
        let value = OptionValue::from(value);
        if !draft.kind.has_options() || label.is_empty() || value.is_empty() {
            return Ok(false);
        }
        draft.options.push(FormOption { label: label.to_string(), value });
        Ok(true)
    }

    /// Removes the draft option at `index`. Out of range is a no-op.
    pub fn remove_draft_option(&mut self, index: usize) -> Result<bool> {
        let draft = self.draft.as_mut().ok_or(FormsError::NoDraft)?;
        if index >= draft.options.len() {
            return Ok(false);
        }
        draft.options.remove(index);
        Ok(true)
    }

    /// Turns the draft into a field and appends it to the form.
    ///
    /// With an empty label or name nothing changes, the draft stays open and
    /// `DraftIncomplete` names what is missing.
    pub fn commit_draft(&mut self) -> Result<&Field> {
        let draft = self.draft.as_ref().ok_or(FormsError::NoDraft)?;
        let missing = draft.missing();
        if !missing.is_empty() {
            return Err(FormsError::DraftIncomplete { missing: missing.join(", ") });
        }

        let Some(draft) = self.draft.take() else {
            return Err(FormsError::NoDraft);
        };
        let id = self.ids.next(&self.form);
        let base = FieldBase { label: draft.label, name: draft.name, placeholder: draft.placeholder };
        let field = Field::new(id.clone(), draft.kind, base, draft.options);
        tracing::debug!(field_id = %id, kind = %field.kind(), "field added");
        self.form.append(field)?;
        self.form.field(&id).ok_or(FormsError::FieldNotFound(id))
    }

    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    // -------------------------------------------------------------------------
    // Field edits
    // -------------------------------------------------------------------------

    /// Removes a field. Returns whether anything was removed.
    pub fn delete_field(&mut self, id: &str) -> bool {
        if self.staged.as_ref().is_some_and(|f| f.id == id) {
            self.staged = None;
        }
        let removed = self.form.remove(id).is_some();
        if removed {
            tracing::debug!(field_id = %id, "field deleted");
        }
        removed
    }

    /// Coerces `raw` for the field's kind, stores it and fires on-change.
    /// On a coercion failure the previous value is kept.
    pub fn set_field_value(&mut self, id: &str, raw: &Value) -> Result<FieldValue> {
        let field = self.form.field(id).ok_or_else(|| FormsError::FieldNotFound(id.to_string()))?;
        let value = field.coerce(raw)?;
        self.form.set_value(id, value.clone())?;
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Stages a copy of the field for a settings edit.
    pub fn open_field_settings(&mut self, id: &str) -> Result<&Field> {
        let field = self.form.field(id).ok_or_else(|| FormsError::FieldNotFound(id.to_string()))?;
        Ok(&*self.staged.insert(field.clone()))
    }

    pub fn staged_settings(&self) -> Option<&Field> {
        self.staged.as_ref()
    }

    /// Controls of the settings editor for the staged field.
    pub fn settings_editor(&self) -> Option<Vec<SettingView>> {
        self.staged.as_ref().map(render::settings_editor)
    }

    /// Merges one validation attribute into the staged copy.
    pub fn set_field_validation_attribute(
        &mut self,
        id: &str,
        key: RuleKey,
        input: SettingInput,
    ) -> Result<&ValidationRule> {
        let staged = self
            .staged
            .as_mut()
            .filter(|f| f.id == id)
            .ok_or(FormsError::NoStagedSettings)?;
        let kind = staged.kind();
        if !render::settings_keys(kind).contains(&key) {
            return Err(FormsError::SettingNotSupported { kind, key });
        }
        let update = RuleUpdate::parse(key, input)?;
        let rule = staged.validation.clone().unwrap_or_default().merge(update)?;
        Ok(&*staged.validation.insert(rule))
    }

    /// Writes the staged rule back to the field with the same id.
    pub fn save_field_settings(&mut self) -> Result<&Field> {
        let staged = self.staged.take().ok_or(FormsError::NoStagedSettings)?;
        let mut field = self
            .form
            .field(&staged.id)
            .cloned()
            .ok_or_else(|| FormsError::FieldNotFound(staged.id.clone()))?;
        field.validation = staged.validation;
        self.form.replace(field)?;
        self.form.field(&staged.id).ok_or(FormsError::FieldNotFound(staged.id))
    }

    pub fn cancel_field_settings(&mut self) {
        self.staged = None;
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validates and flattens the form, fires on-submit, and when a
    /// submitter is configured starts delivery on a background task.
    ///
    /// Refused with `SubmissionInFlight` until the previous delivery settles.
    pub fn submit(&mut self) -> Result<Submission> {
        if self.is_submitting() {
            return Err(FormsError::SubmissionInFlight);
        }
        let delivery_target = match &self.submitter {
            Some(submitter) => {
                let runtime = Handle::try_current().map_err(|e| FormsError::SubmissionTransport {
                    status: None,
                    message: format!("no async runtime: {e}"),
                })?;
                Some((submitter.clone(), runtime))
            }
            None => None,
        };

        let values = self.form.submit()?;
        tracing::debug!(event = %self.event_name, fields = values.len(), "form submitted");

        let delivery = delivery_target.map(|(submitter, runtime)| {
            self.in_flight.store(true, Ordering::SeqCst);
            let guard = InFlightGuard(self.in_flight.clone());
            let on_settled = self.on_settled.clone();
            let request = SubmitRequest { form: values.clone(), event_name: self.event_name.clone() };
            runtime.spawn(async move {
                let outcome = submitter.submit(&request).await;
                drop(guard);
                match &outcome {
                    Ok(receipt) => {
                        tracing::info!(event = %request.event_name, status = receipt.status, "submission stored")
                    }
                    Err(e) => tracing::warn!(event = %request.event_name, error = %e, "submission not stored"),
                }
                if let Some(callback) = on_settled {
                    callback(&outcome);
                }
                outcome
            })
        });

        Ok(Submission { values, delivery })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldInput;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn builder() -> FormBuilder {
        FormBuilder::new("meetup", Form::new(|_| {}))
    }

    fn add(builder: &mut FormBuilder, kind: FieldKind, label: &str, name: &str) -> String {
        builder.add_field_draft(kind);
        builder.set_draft_attribute(DraftAttribute::Label(label.into())).unwrap();
        builder.set_draft_attribute(DraftAttribute::Name(name.into())).unwrap();
        builder.commit_draft().unwrap().id.clone()
    }

    #[test]
    fn test_commit_every_kind() {
        let mut b = builder();
        let mut ids = HashSet::new();
        for kind in FieldKind::ALL {
            let before = b.form().len();
            let id = add(&mut b, kind, "Label", kind.as_str());
            assert_eq!(b.form().len(), before + 1);
            assert!(ids.insert(id.clone()), "id {id} reused");
            let field = b.form().field(&id).unwrap();
            assert_eq!(field.kind(), kind);
            assert_eq!(field.value(), FieldInput::default_for(kind, vec![]).value());
            assert!(b.draft().is_none());
        }
    }

    #[test]
    fn test_commit_incomplete_draft_is_reported() {
        let mut b = builder();
        b.add_field_draft(FieldKind::Text);
        b.set_draft_attribute(DraftAttribute::Label("Name".into())).unwrap();
        assert_eq!(b.commit_draft().unwrap_err(), FormsError::DraftIncomplete { missing: "name".into() });
        assert!(b.form().is_empty());
        assert!(b.draft().is_some());

        b.set_draft_attribute(DraftAttribute::Label(String::new())).unwrap();
        assert_eq!(b.commit_draft().unwrap_err(), FormsError::DraftIncomplete { missing: "label, name".into() });
        assert_eq!(builder().commit_draft().unwrap_err(), FormsError::NoDraft);
    }

    #[test]
    fn test_whitespace_counts_as_content() {
        let mut b = builder();
        b.add_field_draft(FieldKind::Radio);
        assert!(b.add_draft_option(" ", " ").unwrap());
        b.set_draft_attribute(DraftAttribute::Label(" ".into())).unwrap();
        b.set_draft_attribute(DraftAttribute::Name(" ".into())).unwrap();
        let field = b.commit_draft().unwrap();
        assert_eq!(field.label, " ");
        assert_eq!(field.options(), &[FormOption::new(" ", " ")]);
    }

    #[test]
    fn test_draft_options() {
        let mut b = builder();
        b.add_field_draft(FieldKind::Radio);
        assert!(!b.add_draft_option("", "x").unwrap());
        assert!(!b.add_draft_option("Label", "").unwrap());
        assert!(b.draft().unwrap().options.is_empty());

        assert!(b.add_draft_option("Small", "s").unwrap());
        assert!(b.add_draft_option("Large", "l").unwrap());
        assert!(!b.remove_draft_option(5).unwrap());
        assert!(b.remove_draft_option(0).unwrap());
        assert_eq!(b.draft().unwrap().options, vec![FormOption::new("Large", "l")]);

        b.set_draft_attribute(DraftAttribute::Label("Size".into())).unwrap();
        b.set_draft_attribute(DraftAttribute::Name("size".into())).unwrap();
        let field = b.commit_draft().unwrap();
        assert_eq!(field.options(), &[FormOption::new("Large", "l")]);
    }

    #[test]
    fn test_options_ignored_for_plain_kinds() {
        let mut b = builder();
        b.add_field_draft(FieldKind::Text);
        assert!(!b.add_draft_option("A", "a").unwrap());
    }

    #[test]
    fn test_draft_attribute_parsing() {
        assert_eq!(DraftAttribute::parse("type", "radio").unwrap(), DraftAttribute::Kind(FieldKind::Radio));
        assert!(matches!(DraftAttribute::parse("type", "slider"), Err(FormsError::InvalidFieldKind(_))));
        assert!(matches!(DraftAttribute::parse("colour", "red"), Err(FormsError::UnknownAttribute(_))));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut b = builder();
        let id = add(&mut b, FieldKind::Text, "City", "city");
        assert!(b.delete_field(&id));
        assert!(!b.delete_field(&id));
        assert!(b.form().is_empty());
    }

    #[test]
    fn test_ids_skip_existing_fields() {
        let taken = format!("field-{}", Utc::now().timestamp_millis() + 1);
        let seed = Field::new(taken.clone(), FieldKind::Text, FieldBase::new("A", "a"), vec![]);
        let mut b = FormBuilder::new("meetup", Form::with_fields(vec![seed], |_| {}).unwrap());
        let first = add(&mut b, FieldKind::Text, "B", "b");
        let second = add(&mut b, FieldKind::Text, "C", "c");
        assert_ne!(first, taken);
        assert_ne!(second, taken);
        assert_ne!(first, second);
    }

    #[test]
    fn test_set_value_coerces_and_notifies() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        let form = Form::new(|_| {})
            .on_change(move |field, value| sink.lock().unwrap().push((field.name.clone(), value.clone())));
        let mut b = FormBuilder::new("meetup", form);
        let age = add(&mut b, FieldKind::Number, "Age", "age");
        let agree = add(&mut b, FieldKind::Checkbox, "Agree", "agree");

        assert_eq!(b.set_field_value(&age, &json!("42")).unwrap(), FieldValue::Number(42.0));
        assert_eq!(b.set_field_value(&agree, &json!("on")).unwrap(), FieldValue::Bool(true));

        let err = b.set_field_value(&age, &json!("abc")).unwrap_err();
        assert!(matches!(err, FormsError::ValueCoercion { .. }));
        assert_eq!(b.form().field(&age).unwrap().value(), FieldValue::Number(42.0));

        assert_eq!(
            *changes.lock().unwrap(),
            vec![("age".to_string(), FieldValue::Number(42.0)), ("agree".to_string(), FieldValue::Bool(true))]
        );
        assert!(matches!(b.set_field_value("nope", &json!(1)), Err(FormsError::FieldNotFound(_))));
    }

    #[test]
    fn test_settings_are_staged_until_saved() {
        let mut b = builder();
        let age = add(&mut b, FieldKind::Number, "Age", "age");
        b.open_field_settings(&age).unwrap();
        b.set_field_validation_attribute(&age, RuleKey::Required, SettingInput::Checked(true)).unwrap();
        b.set_field_validation_attribute(&age, RuleKey::Max, SettingInput::Text("120".into())).unwrap();
        assert!(!b.form().field(&age).unwrap().is_required());

        let saved = b.save_field_settings().unwrap();
        let rule = saved.validation.as_ref().unwrap();
        assert!(rule.required);
        assert_eq!(rule.max, Some(120.0));
        assert!(b.staged_settings().is_none());
    }

    #[test]
    fn test_cancelled_settings_leave_field_untouched() {
        let mut b = builder();
        let id = add(&mut b, FieldKind::Text, "City", "city");
        b.open_field_settings(&id).unwrap();
        b.set_field_validation_attribute(&id, RuleKey::MinLength, SettingInput::Text("2".into())).unwrap();
        b.cancel_field_settings();
        assert_eq!(b.form().field(&id).unwrap().validation, Some(ValidationRule::default()));
        assert_eq!(b.save_field_settings().unwrap_err(), FormsError::NoStagedSettings);
    }

    #[test]
    fn test_settings_dispatch_per_kind() {
        let mut b = builder();
        let agree = add(&mut b, FieldKind::Checkbox, "Agree", "agree");
        b.open_field_settings(&agree).unwrap();
        assert_eq!(
            b.set_field_validation_attribute(&agree, RuleKey::MinLength, SettingInput::Text("1".into())).unwrap_err(),
            FormsError::SettingNotSupported { kind: FieldKind::Checkbox, key: RuleKey::MinLength }
        );
        assert_eq!(b.settings_editor().unwrap().len(), 1);

        let email = add(&mut b, FieldKind::Email, "Email", "email");
        b.open_field_settings(&email).unwrap();
        b.set_field_validation_attribute(&email, RuleKey::Pattern, SettingInput::Text(".+@.+".into())).unwrap();
        assert!(matches!(
            b.set_field_validation_attribute(&agree, RuleKey::Required, SettingInput::Checked(true)),
            Err(FormsError::NoStagedSettings)
        ));
    }

    #[test]
    fn test_deleting_staged_field_discards_settings() {
        let mut b = builder();
        let id = add(&mut b, FieldKind::Text, "City", "city");
        b.open_field_settings(&id).unwrap();
        b.delete_field(&id);
        assert!(b.staged_settings().is_none());
    }

    #[test]
    fn test_submit_without_submitter() {
        let submitted = Arc::new(Mutex::new(None));
        let sink = submitted.clone();
        let mut b = FormBuilder::new("meetup", Form::new(move |values| *sink.lock().unwrap() = Some(values.clone())));
        let gender = {
            b.add_field_draft(FieldKind::Select);
            b.add_draft_option("Male", "male").unwrap();
            b.add_draft_option("Female", "female").unwrap();
            b.set_draft_attribute(DraftAttribute::Label("Gender".into())).unwrap();
            b.set_draft_attribute(DraftAttribute::Name("gender".into())).unwrap();
            b.commit_draft().unwrap().id.clone()
        };
        b.set_field_value(&gender, &json!("male")).unwrap();

        let submission = b.submit().unwrap();
        assert!(submission.delivery.is_none());
        assert_eq!(submission.values["gender"], json!("male"));
        assert_eq!(submitted.lock().unwrap().as_ref(), Some(&submission.values));
    }

    #[test]
    fn test_submit_blocked_by_violations() {
        let mut b = builder();
        let id = add(&mut b, FieldKind::Text, "City", "city");
        b.open_field_settings(&id).unwrap();
        b.set_field_validation_attribute(&id, RuleKey::Required, SettingInput::Checked(true)).unwrap();
        b.save_field_settings().unwrap();

        match b.submit() {
            Err(FormsError::ValidationFailed(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field_id, id);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    struct GatedSubmitter {
        gate: Arc<Notify>,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl FormSubmitter for GatedSubmitter {
        async fn submit(&self, request: &SubmitRequest) -> Result<SubmissionReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            if self.fail {
                Err(FormsError::SubmissionTransport { status: Some(500), message: "down".into() })
            } else {
                Ok(SubmissionReceipt { status: 201, document: json!({ "eventName": request.event_name }) })
            }
        }
    }

    #[tokio::test]
    async fn test_single_submission_in_flight() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(GatedSubmitter { gate: gate.clone(), calls: AtomicUsize::new(0), fail: false });
        let mut b = builder().with_submitter(submitter.clone());

        let first = b.submit().unwrap();
        assert!(b.is_submitting());
        assert_eq!(b.submit().unwrap_err(), FormsError::SubmissionInFlight);

        gate.notify_one();
        let receipt = first.delivery.unwrap().await.unwrap().unwrap();
        assert_eq!(receipt.document["eventName"], "meetup");
        assert!(!b.is_submitting());

        gate.notify_one();
        b.submit().unwrap().delivery.unwrap().await.unwrap().unwrap();
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_reported_and_reenables_submit() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(GatedSubmitter { gate: gate.clone(), calls: AtomicUsize::new(0), fail: true });
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = settled.clone();
        let mut b = builder()
            .with_submitter(submitter)
            .on_settled(move |outcome| sink.lock().unwrap().push(outcome.is_ok()));

        gate.notify_one();
        let outcome = b.submit().unwrap().delivery.unwrap().await.unwrap();
        assert!(matches!(outcome, Err(FormsError::SubmissionTransport { status: Some(500), .. })));
        assert_eq!(*settled.lock().unwrap(), vec![false]);
        assert!(!b.is_submitting());
    }

    #[test]
    fn test_submit_with_submitter_needs_runtime() {
        let submitter =
            Arc::new(GatedSubmitter { gate: Arc::new(Notify::new()), calls: AtomicUsize::new(0), fail: false });
        let mut b = builder().with_submitter(submitter);
        assert!(matches!(b.submit(), Err(FormsError::SubmissionTransport { status: None, .. })));
        assert!(!b.is_submitting());
    }
}
