use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::check_length;
use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<AS: AuthServicePort>(
    State(state): State<AppState<AS>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|registration| {
            ApiSuccess::new(
                StatusCode::CREATED,
                TokenResponseData {
                    user_id: registration.user_id.0,
                    token: registration.token,
                    message: "Registration successful".to_string(),
                },
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    login: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        check_length("login", &self.login, 4, 32)?;
        if let Some(email) = &self.email {
            check_length("email", email, 0, 100)?;
        }
        check_length("password", &self.password, 8, 32)?;

        let email = EmailAddress::optional(self.email)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(RegisterCommand::new(self.login, email, self.password))
    }
}
