//! EventForms Form Builder
//!
//! Runtime form builder for events: typed fields, per-field validation
//! rules, and submission of the filled-in form to the forms API.
//!
//! ## Layers
//! - [`field`]: the closed set of field kinds and their values
//! - [`validation`]: constraint rules attached to a field
//! - [`form`]: ordered fields plus change/submit callbacks
//! - [`builder`]: the interactive editor (drafts, settings, values, submit)
//! - [`render`]: per-kind control and settings-editor descriptors
//! - [`submission`]: flattening a form into `name -> value`
//! - [`transport`]: forwarding a submission to the forms API

pub mod builder;
pub mod field;
pub mod form;
pub mod render;
pub mod submission;
pub mod transport;
pub mod validation;

pub use builder::{DraftAttribute, FieldDraft, FormBuilder, Submission};
pub use field::{ChoiceValue, Field, FieldBase, FieldInput, FieldKind, FieldValue, FileRef, FormOption, OptionValue};
pub use form::Form;
pub use submission::{serialize, FieldViolation, SubmissionMap};
pub use transport::{FormSubmitter, HttpSubmitter, SubmissionReceipt, SubmitRequest, SubmitterConfig};
pub use validation::{RuleKey, RuleUpdate, RuleViolation, SettingInput, ValidationRule};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormsError {
    #[error("invalid field kind: {0}")]
    InvalidFieldKind(String),

    #[error("draft incomplete: missing {missing}")]
    DraftIncomplete { missing: String },

    #[error("no field draft is open")]
    NoDraft,

    #[error("unknown draft attribute: {0}")]
    UnknownAttribute(String),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("duplicate field id: {0}")]
    DuplicateFieldId(String),

    #[error("field {field_id} is {existing}, cannot become {requested}")]
    KindChange {
        field_id: String,
        existing: FieldKind,
        requested: FieldKind,
    },

    #[error("invalid value for field {field_id}: {reason}")]
    ValueCoercion { field_id: String, reason: String },

    #[error("no field settings are staged")]
    NoStagedSettings,

    #[error("{kind} fields do not expose the {key} setting")]
    SettingNotSupported { kind: FieldKind, key: RuleKey },

    #[error("invalid validation rule: {0}")]
    InvalidRule(String),

    #[error("form has {} validation error(s)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("submission failed: {message}")]
    SubmissionTransport { status: Option<u16>, message: String },
}

pub type Result<T> = std::result::Result<T, FormsError>;
