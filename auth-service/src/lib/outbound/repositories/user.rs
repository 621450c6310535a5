use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::errors::AuthError;
use crate::account::models::EmailAddress;
use crate::account::models::Login;
use crate::account::models::NewUser;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    login: String,
    username: String,
    email: Option<String>,
    password_hash: String,
    is_activated: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt =
            |e: String| AuthError::StoreUnavailable(format!("corrupt user row {}: {}", id, e));

        let login = Login::new(row.login).map_err(|e| corrupt(e.to_string()))?;
        let email = EmailAddress::optional(row.email).map_err(|e| corrupt(e.to_string()))?;

        Ok(User {
            id: UserId(id),
            login,
            username: row.username,
            email,
            password_hash: row.password_hash,
            is_activated: row.is_activated,
            created_at: row.created_at,
        })
    }
}

fn unavailable(e: sqlx::Error) -> AuthError {
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn exists(&self, login: &Login, email: Option<EmailAddress>) -> Result<bool, AuthError> {
        let query = match &email {
            Some(email) => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE login = $1 OR email = $2)",
            )
            .bind(login.as_str())
            .bind(email.as_str()),
            None => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)",
            )
            .bind(login.as_str()),
        };

        query.fetch_one(&self.pool).await.map_err(unavailable)
    }

    async fn create(&self, user: NewUser) -> Result<UserId, AuthError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (login, username, email, password_hash, is_activated)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.login.as_str())
        .bind(&user.username)
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(&user.password_hash)
        .bind(user.is_activated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("users_email_key") => AuthError::DuplicateCredential(format!(
                            "email {}",
                            user.email.as_ref().map(|e| e.as_str()).unwrap_or_default()
                        )),
                        _ => AuthError::DuplicateCredential(format!("login {}", user.login)),
                    };
                }
            }
            unavailable(e)
        })?;

        Ok(UserId(id))
    }

    async fn find_by_login_or_email(&self, identifier: &str) -> Result<User, AuthError> {
        // A login match wins over an email match belonging to another user.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, username, email, password_hash, is_activated, created_at
            FROM users
            WHERE login = $1 OR email = $1
            ORDER BY (login = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.ok_or(AuthError::NotFound)?.try_into()
    }
}
