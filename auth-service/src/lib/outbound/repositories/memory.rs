use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::EmailAddress;
use crate::account::models::Login;
use crate::account::models::NewUser;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::CredentialStore;

/// Credential store kept in process memory.
///
/// Same uniqueness rules as the relational table: IDs are assigned
/// sequentially from 1, login is unique, email is unique when present.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn users(&self) -> Result<MutexGuard<'_, Vec<User>>, AuthError> {
        self.users
            .lock()
            .map_err(|e| AuthError::StoreUnavailable(format!("credential store poisoned: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists(&self, login: &Login, email: Option<EmailAddress>) -> Result<bool, AuthError> {
        let users = self.users()?;
        Ok(users.iter().any(|user| {
            user.login == *login || (email.is_some() && user.email.as_ref() == email.as_ref())
        }))
    }

    async fn create(&self, user: NewUser) -> Result<UserId, AuthError> {
        let mut users = self.users()?;

        if users.iter().any(|existing| existing.login == user.login) {
            return Err(AuthError::DuplicateCredential(format!("login {}", user.login)));
        }
        if let Some(email) = &user.email {
            if users.iter().any(|existing| existing.email.as_ref() == Some(email)) {
                return Err(AuthError::DuplicateCredential(format!(
                    "email {}",
                    email.as_str()
                )));
            }
        }

        let id = UserId(users.len() as i64 + 1);
        users.push(User {
            id,
            login: user.login,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_activated: user.is_activated,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_by_login_or_email(&self, identifier: &str) -> Result<User, AuthError> {
        let users = self.users()?;

        users
            .iter()
            .find(|user| user.login.as_str() == identifier)
            .or_else(|| {
                users
                    .iter()
                    .find(|user| user.email.as_ref().map(|e| e.as_str()) == Some(identifier))
            })
            .cloned()
            .ok_or(AuthError::NotFound)
    }
}
