//! Submission serializer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::field::Field;
use crate::validation::RuleViolation;

/// Flat `name -> value` map handed to on-submit and sent to the forms API.
pub type SubmissionMap = BTreeMap<String, Value>;

/// Flattens fields into a submission map. A later field wins over an earlier
/// one with the same name.
pub fn serialize(fields: &[Field]) -> SubmissionMap {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.value().to_json()))
        .collect()
}

/// A rule violation attributed to the field it was found on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field_id: String,
    pub name: String,
    pub violation: RuleViolation,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.field_id, self.violation)
    }
}

/// Checks every enabled field against its validation rule.
pub fn validate(fields: &[Field]) -> Vec<FieldViolation> {
    fields
        .iter()
        .filter(|field| !field.disabled)
        .flat_map(|field| {
            field
                .validation
                .as_ref()
                .map(|rule| rule.check(field.input()))
                .unwrap_or_default()
                .into_iter()
                .map(move |violation| FieldViolation {
                    field_id: field.id.clone(),
                    name: field.name.clone(),
                    violation,
                })
        })
        .collect()
}
