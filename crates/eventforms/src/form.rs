//! Form aggregate

use std::collections::HashSet;
use std::fmt;

use crate::field::{Field, FieldValue};
use crate::submission::{self, FieldViolation, SubmissionMap};
use crate::{FormsError, Result};

pub type SubmitCallback = Box<dyn FnMut(&SubmissionMap) + Send>;
pub type ChangeCallback = Box<dyn FnMut(&Field, &FieldValue) + Send>;

/// Ordered fields plus the callbacks fired on change and on submit.
///
/// Field ids are unique for the lifetime of the form. Fields are appended,
/// removed or replaced in place; the order never changes otherwise.
pub struct Form {
    fields: Vec<Field>,
    on_submit: SubmitCallback,
    on_change: Option<ChangeCallback>,
}

impl Form {
    pub fn new(on_submit: impl FnMut(&SubmissionMap) + Send + 'static) -> Self {
        Self { fields: Vec::new(), on_submit: Box::new(on_submit), on_change: None }
    }

    /// Creates a form with an initial field set. Fails on a repeated id.
    pub fn with_fields(fields: Vec<Field>, on_submit: impl FnMut(&SubmissionMap) + Send + 'static) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            if let Some(dup) = fields.iter().find(|f| !seen.insert(f.id.as_str())) {
                return Err(FormsError::DuplicateFieldId(dup.id.clone()));
            }
        }
        Ok(Self { fields, on_submit: Box::new(on_submit), on_change: None })
    }

    pub fn on_change(mut self, on_change: impl FnMut(&Field, &FieldValue) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn append(&mut self, field: Field) -> Result<()> {
        if self.contains(&field.id) {
            return Err(FormsError::DuplicateFieldId(field.id));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Field> {
        let idx = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(idx))
    }

    /// Replaces the field with the same id, keeping its position. The kind
    /// of a field never changes.
    pub fn replace(&mut self, field: Field) -> Result<()> {
        let slot = self
            .fields
            .iter_mut()
            .find(|f| f.id == field.id)
            .ok_or_else(|| FormsError::FieldNotFound(field.id.clone()))?;
        let requested = field.kind();
        if slot.kind() != requested {
            return Err(FormsError::KindChange {
                field_id: field.id,
                existing: slot.kind(),
                requested,
            });
        }
        *slot = field;
        Ok(())
    }

    /// Stores a coerced value and notifies on-change before returning.
    pub fn set_value(&mut self, id: &str, value: FieldValue) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FormsError::FieldNotFound(id.to_string()))?;
        field.assign(value.clone())?;
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(field, &value);
        }
        Ok(())
    }

    pub fn values(&self) -> SubmissionMap {
        submission::serialize(&self.fields)
    }

    pub fn validate(&self) -> Vec<FieldViolation> {
        submission::validate(&self.fields)
    }

    /// Validates, then hands the flattened values to on-submit.
    pub fn submit(&mut self) -> Result<SubmissionMap> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(FormsError::ValidationFailed(violations));
        }
        let values = self.values();
        (self.on_submit)(&values);
        Ok(values)
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}
