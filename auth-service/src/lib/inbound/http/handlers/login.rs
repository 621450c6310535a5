use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::check_length;
use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use super::INVALID_CREDENTIALS_MESSAGE;
use crate::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<AS: AuthServicePort>(
    State(state): State<AppState<AS>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    body.validate()?;

    let authentication = state
        .auth_service
        .authenticate(&body.identifier, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData {
            user_id: authentication.user.id.0,
            token: authentication.token,
            message: "Login successful".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// Login or email
    identifier: String,
    password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        check_length("identifier", &self.identifier, 1, 100)?;
        // Oversized passwords cannot match anything registered.
        check_length("password", &self.password, 1, 32)
            .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()))
    }
}
