use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenIssuer;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::Authentication;
use crate::account::models::Login;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::Registration;
use crate::account::models::UserId;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::account::ports::RevocationLedger;

/// Domain service composing credential storage, password hashing, token
/// issuance and revocation.
///
/// Holds no mutable state: all shared state lives behind the two ports.
/// Every port call and every hashing job runs under `operation_timeout`;
/// an elapsed deadline surfaces as an error and is never retried.
pub struct AuthService<CS, RL>
where
    CS: CredentialStore,
    RL: RevocationLedger,
{
    store: Arc<CS>,
    ledger: Arc<RL>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
    operation_timeout: Duration,
}

impl<CS, RL> AuthService<CS, RL>
where
    CS: CredentialStore,
    RL: RevocationLedger,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `ledger` - Revocation ledger implementation
    /// * `token_issuer` - Configured token issuer
    /// * `operation_timeout` - Deadline applied to each store, ledger and hashing call
    pub fn new(
        store: Arc<CS>,
        ledger: Arc<RL>,
        token_issuer: Arc<TokenIssuer>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            token_issuer,
            password_hasher: PasswordHasher::new(),
            operation_timeout,
        }
    }

    async fn within<T, F>(
        &self,
        operation: F,
        on_timeout: fn(String) -> AuthError,
    ) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .map_err(|_| on_timeout(format!("deadline of {:?} elapsed", self.operation_timeout)))?
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.password_hasher;
        let password = password.to_owned();
        let job = tokio::task::spawn_blocking(move || hasher.hash(&password));

        match tokio::time::timeout(self.operation_timeout, job).await {
            Ok(Ok(hashed)) => hashed.map_err(|e| AuthError::HashingFailed(e.to_string())),
            Ok(Err(join_error)) => Err(AuthError::HashingFailed(join_error.to_string())),
            Err(_) => Err(AuthError::HashingFailed(format!(
                "deadline of {:?} elapsed",
                self.operation_timeout
            ))),
        }
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.password_hasher;
        let password = password.to_owned();
        let hash = hash.to_owned();
        let job = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash));

        match tokio::time::timeout(self.operation_timeout, job).await {
            Ok(Ok(verified)) => {
                verified.map_err(|e| AuthError::PasswordCompareFailed(e.to_string()))
            }
            Ok(Err(join_error)) => Err(AuthError::PasswordCompareFailed(join_error.to_string())),
            Err(_) => Err(AuthError::PasswordCompareFailed(format!(
                "deadline of {:?} elapsed",
                self.operation_timeout
            ))),
        }
    }

    fn issue_token(&self, user_id: UserId) -> Result<String, AuthError> {
        self.token_issuer
            .issue(user_id.0, Role::default())
            .map_err(|e| AuthError::TokenGenerationFailed(e.to_string()))
    }
}

#[async_trait]
impl<CS, RL> AuthServicePort for AuthService<CS, RL>
where
    CS: CredentialStore,
    RL: RevocationLedger,
{
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError> {
        let login = Login::new(command.login)?;

        let taken = self
            .within(
                self.store.exists(&login, command.email.clone()),
                AuthError::StoreUnavailable,
            )
            .await?;
        if taken {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hash_password(&command.password).await?;

        let new_user = NewUser {
            username: login.as_str().to_string(),
            login,
            email: command.email,
            password_hash,
            is_activated: true,
        };
        let user_id = self
            .within(self.store.create(new_user), AuthError::StoreUnavailable)
            .await?;

        let token = self.issue_token(user_id)?;
        tracing::info!(user_id = %user_id, "User registered");

        Ok(Registration { user_id, token })
    }

    async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Authentication, AuthError> {
        let user = self
            .within(
                self.store.find_by_login_or_email(identifier),
                AuthError::StoreUnavailable,
            )
            .await?;

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = %user.id, "User authenticated");

        Ok(Authentication { user, token })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = match self.token_issuer.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Logout with unverifiable token ignored");
                return Ok(());
            }
        };

        let Some(remaining) = claims.remaining_lifetime(Utc::now()) else {
            return Ok(());
        };

        let user_id = UserId(claims.user_id);
        self.within(
            self.ledger.revoke(token, user_id, remaining),
            AuthError::LedgerUnavailable,
        )
        .await
        .map_err(|e| AuthError::RevocationFailed(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            ttl_secs = remaining.as_secs(),
            "Token revoked"
        );
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        self.within(self.ledger.is_revoked(token), AuthError::LedgerUnavailable)
            .await
    }

    fn parse_claims(&self, token: &str) -> Result<Claims, AuthError> {
        self.token_issuer.verify(token).map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::account::models::EmailAddress;
    use crate::account::models::User;

    const TIMEOUT: Duration = Duration::from_secs(30);

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn exists(&self, login: &Login, email: Option<EmailAddress>) -> Result<bool, AuthError>;
            async fn create(&self, user: NewUser) -> Result<UserId, AuthError>;
            async fn find_by_login_or_email(&self, identifier: &str) -> Result<User, AuthError>;
        }
    }

    mock! {
        pub TestRevocationLedger {}

        #[async_trait]
        impl RevocationLedger for TestRevocationLedger {
            async fn revoke(&self, token: &str, user_id: UserId, ttl: Duration) -> Result<(), AuthError>;
            async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;
        }
    }

    fn token_issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            auth::TokenConfig::new(
                "test_secret_key_at_least_32_bytes!",
                chrono::Duration::hours(1),
            )
            .unwrap(),
        ))
    }

    fn service(
        store: MockTestCredentialStore,
        ledger: MockTestRevocationLedger,
        issuer: Arc<TokenIssuer>,
    ) -> AuthService<MockTestCredentialStore, MockTestRevocationLedger> {
        AuthService::new(Arc::new(store), Arc::new(ledger), issuer, TIMEOUT)
    }

    fn stored_user(id: i64, login: &str, password: &str) -> User {
        User {
            id: UserId(id),
            login: Login::new(login.to_string()).unwrap(),
            username: login.to_string(),
            email: None,
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            is_activated: true,
            created_at: Utc::now(),
        }
    }

    fn register_command(login: &str, email: Option<&str>) -> RegisterCommand {
        RegisterCommand::new(
            login.to_string(),
            email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
            "password1".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();
        let issuer = token_issuer();

        store
            .expect_exists()
            .withf(|login, email| {
                login.as_str() == "alice" && email.as_ref().map(|e| e.as_str()) == Some("a@x.com")
            })
            .times(1)
            .returning(|_, _| Ok(false));
        store
            .expect_create()
            .withf(|user| {
                user.login.as_str() == "alice"
                    && user.username == "alice"
                    && user.is_activated
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|_| Ok(UserId(1)));

        let service = service(store, ledger, Arc::clone(&issuer));
        let registration = service
            .register(register_command("alice", Some("a@x.com")))
            .await
            .expect("registration failed");

        assert_eq!(registration.user_id, UserId(1));
        let claims = issuer.verify(&registration.token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.role, Role::Member);
    }

    #[tokio::test]
    async fn test_register_invalid_login_touches_nothing() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        store.expect_exists().times(0);
        store.expect_create().times(0);

        let service = service(store, ledger, token_issuer());

        for login in ["a@x.com", "al ice"] {
            let result = service.register(register_command(login, None)).await;
            assert!(matches!(result, Err(AuthError::InvalidLoginChars(_))));
        }
    }

    #[tokio::test]
    async fn test_register_existing_user() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        store.expect_exists().times(1).returning(|_, _| Ok(true));
        store.expect_create().times(0);

        let service = service(store, ledger, token_issuer());
        let result = service.register(register_command("alice", None)).await;

        assert_eq!(result, Err(AuthError::UserExists));
    }

    #[tokio::test]
    async fn test_register_lost_race_reports_duplicate() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        store.expect_exists().times(1).returning(|_, _| Ok(false));
        store
            .expect_create()
            .times(1)
            .returning(|user| Err(AuthError::DuplicateCredential(user.login.to_string())));

        let service = service(store, ledger, token_issuer());
        let result = service.register(register_command("alice", None)).await;

        assert_eq!(
            result,
            Err(AuthError::DuplicateCredential("alice".to_string()))
        );
    }

    #[tokio::test]
    async fn test_register_store_fault_surfaces() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        store
            .expect_exists()
            .times(1)
            .returning(|_, _| Err(AuthError::StoreUnavailable("connection refused".to_string())));

        let service = service(store, ledger, token_issuer());
        let result = service.register(register_command("alice", None)).await;

        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();
        let issuer = token_issuer();

        let user = stored_user(7, "alice", "password1");
        store
            .expect_find_by_login_or_email()
            .withf(|identifier| identifier == "alice")
            .times(1)
            .returning(move |_| Ok(user.clone()));

        let service = service(store, ledger, Arc::clone(&issuer));
        let authentication = service.authenticate("alice", "password1").await.unwrap();

        assert_eq!(authentication.user.id, UserId(7));
        let claims = issuer.verify(&authentication.token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, Role::Member);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        let user = stored_user(7, "alice", "password1");
        store
            .expect_find_by_login_or_email()
            .returning(move |_| Ok(user.clone()));

        let service = service(store, ledger, token_issuer());
        let result = service.authenticate("alice", "wrong").await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_identifier() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        store
            .expect_find_by_login_or_email()
            .returning(|_| Err(AuthError::NotFound));

        let service = service(store, ledger, token_issuer());
        let result = service.authenticate("nobody", "password1").await;

        assert_eq!(result, Err(AuthError::NotFound));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_stored_hash() {
        let mut store = MockTestCredentialStore::new();
        let ledger = MockTestRevocationLedger::new();

        let mut user = stored_user(7, "alice", "password1");
        user.password_hash = "not-a-phc-string".to_string();
        store
            .expect_find_by_login_or_email()
            .returning(move |_| Ok(user.clone()));

        let service = service(store, ledger, token_issuer());
        let result = service.authenticate("alice", "password1").await;

        assert!(matches!(result, Err(AuthError::PasswordCompareFailed(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_for_remaining_lifetime() {
        let store = MockTestCredentialStore::new();
        let mut ledger = MockTestRevocationLedger::new();
        let issuer = token_issuer();

        // Issued ten minutes ago with a one hour TTL.
        let token = issuer
            .issue_at(3, Role::Member, Utc::now() - chrono::Duration::minutes(10))
            .unwrap();

        let expected_token = token.clone();
        ledger
            .expect_revoke()
            .withf(move |token, user_id, ttl| {
                token == expected_token
                    && *user_id == UserId(3)
                    && *ttl <= Duration::from_secs(50 * 60)
                    && *ttl >= Duration::from_secs(49 * 60)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(store, ledger, issuer);
        service.logout(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_expired_token_is_noop() {
        let store = MockTestCredentialStore::new();
        let mut ledger = MockTestRevocationLedger::new();
        let issuer = token_issuer();

        let token = issuer
            .issue_at(3, Role::Member, Utc::now() - chrono::Duration::hours(2))
            .unwrap();
        ledger.expect_revoke().times(0);

        let service = service(store, ledger, issuer);
        assert_eq!(service.logout(&token).await, Ok(()));
    }

    #[tokio::test]
    async fn test_logout_malformed_token_is_noop() {
        let store = MockTestCredentialStore::new();
        let mut ledger = MockTestRevocationLedger::new();
        ledger.expect_revoke().times(0);

        let service = service(store, ledger, token_issuer());
        assert_eq!(service.logout("not.a.token").await, Ok(()));
        assert_eq!(service.logout("").await, Ok(()));
    }

    #[tokio::test]
    async fn test_logout_ledger_fault() {
        let store = MockTestCredentialStore::new();
        let mut ledger = MockTestRevocationLedger::new();
        let issuer = token_issuer();
        let token = issuer.issue(3, Role::Member).unwrap();

        ledger
            .expect_revoke()
            .times(1)
            .returning(|_, _, _| Err(AuthError::LedgerUnavailable("broken pipe".to_string())));

        let service = service(store, ledger, issuer);
        let result = service.logout(&token).await;

        assert!(matches!(result, Err(AuthError::RevocationFailed(_))));
    }

    #[tokio::test]
    async fn test_is_revoked_surfaces_ledger_fault() {
        let store = MockTestCredentialStore::new();
        let mut ledger = MockTestRevocationLedger::new();

        ledger
            .expect_is_revoked()
            .times(1)
            .returning(|_| Err(AuthError::LedgerUnavailable("timeout".to_string())));

        let service = service(store, ledger, token_issuer());
        let result = service.is_revoked("token").await;

        assert!(matches!(result, Err(AuthError::LedgerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_parse_claims_round_trip() {
        let issuer = token_issuer();
        let service = service(
            MockTestCredentialStore::new(),
            MockTestRevocationLedger::new(),
            Arc::clone(&issuer),
        );

        let token = issuer.issue(11, Role::Member).unwrap();
        let claims = service.parse_claims(&token).unwrap();

        assert_eq!(claims.user_id, 11);
        assert_eq!(claims.role, Role::Member);
        assert_eq!(claims.exp - claims.iat, 3_600);
        assert!(matches!(
            service.parse_claims("garbage"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    struct StalledStore;

    #[async_trait]
    impl CredentialStore for StalledStore {
        async fn exists(&self, _: &Login, _: Option<EmailAddress>) -> Result<bool, AuthError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(false)
        }

        async fn create(&self, _: NewUser) -> Result<UserId, AuthError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(UserId(1))
        }

        async fn find_by_login_or_email(&self, _: &str) -> Result<User, AuthError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(AuthError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_store_deadline_elapses() {
        let service = AuthService::new(
            Arc::new(StalledStore),
            Arc::new(MockTestRevocationLedger::new()),
            token_issuer(),
            Duration::from_millis(50),
        );

        let result = service.authenticate("alice", "password1").await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));

        let result = service.register(register_command("alice", None)).await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
    }
}
