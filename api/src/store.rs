//! Repositories - persistence abstraction for form documents and users
//!
//! Documents are kept in insertion order; listing returns them oldest first.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{CreateUser, FormDocument, User};

/// Repository result type
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Form document repository
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Persist a document and return it as stored
    async fn insert(&self, document: FormDocument) -> RepoResult<FormDocument>;

    /// All documents, oldest first
    async fn list(&self) -> RepoResult<Vec<FormDocument>>;
}

/// User repository
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; fails with `Conflict` when the email is taken
    async fn create(&self, input: CreateUser) -> RepoResult<User>;

    /// All users, oldest first
    async fn list(&self) -> RepoResult<Vec<User>>;
}

/// In-memory form repository
#[derive(Default)]
pub struct InMemoryFormRepository {
    documents: RwLock<Vec<FormDocument>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn insert(&self, document: FormDocument) -> RepoResult<FormDocument> {
        self.documents.write().push(document.clone());
        Ok(document)
    }

    async fn list(&self) -> RepoResult<Vec<FormDocument>> {
        Ok(self.documents.read().clone())
    }
}

struct StoredUser {
    user: User,
    salt: String,
    password_digest: String,
}

/// In-memory user repository. Passwords are kept as salted SHA-256 digests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> RepoResult<User> {
        let email = input.email.trim().to_string();
        let mut users = self.users.write();
        if users.iter().any(|u| u.user.email.eq_ignore_ascii_case(&email)) {
            return Err(RepositoryError::Conflict(format!("email {email} is already registered")));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email,
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            password_digest: digest(&salt, &input.password),
            salt,
            user: user.clone(),
        });
        Ok(user)
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.read().iter().map(|u| u.user.clone()).collect())
    }
}
