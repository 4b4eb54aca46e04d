//! API Models

use chrono::{DateTime, Utc};
use eventforms::FileRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body for every non-2xx response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

// ============ Forms ============

/// Body of a form submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormBody {
    /// Flat `name -> value` map produced by the form builder
    #[schema(value_type = Object)]
    pub form: Map<String, Value>,
    pub event_name: String,
}

/// A stored form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub id: Uuid,
    pub event_name: String,
    #[schema(value_type = Object)]
    pub form: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl FormDocument {
    pub fn new(body: SubmitFormBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_name: body.event_name,
            form: body.form,
            created_at: Utc::now(),
        }
    }
}

impl SubmitFormBody {
    /// Checks the submission against the document schema: a named event and
    /// values that are scalars, null, or a file reference object.
    pub fn validate(&self) -> Result<(), String> {
        if self.event_name.trim().is_empty() {
            return Err("eventName is required".into());
        }
        for (name, value) in &self.form {
            if name.is_empty() {
                return Err("form contains a field without a name".into());
            }
            match value {
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
                Value::Object(_) if serde_json::from_value::<FileRef>(value.clone()).is_ok() => {}
                Value::Object(_) => return Err(format!("field '{name}' holds an object that is not a file reference")),
                Value::Array(_) => return Err(format!("field '{name}' holds a list; expected a single value")),
            }
        }
        Ok(())
    }
}

// ============ Users ============

/// User record. The password digest never leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(format!("'{email}' is not a valid email address")),
        }
        if self.password.is_empty() {
            return Err("password is required".into());
        }
        Ok(())
    }
}
