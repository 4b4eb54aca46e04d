//! Users commands

use super::ApiClient;
use crate::{output::OutputFormat, UserCommands};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    created: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created: user.created_at.clone(),
        }
    }
}

pub async fn handle(action: UserCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    match action {
        UserCommands::List => {
            let users: Vec<User> = client.get("/api/users/").await?;
            format.print(users.as_slice(), |u| UserRow::from(u));
        }
        UserCommands::Create { name, email, password } => {
            let body = serde_json::json!({ "name": name, "email": email, "password": password });
            let user: User = client.post("/api/users/", &body).await?;
            println!("{} {} ({})", "Created user:".green(), user.id, user.email);
        }
    }
    Ok(())
}
