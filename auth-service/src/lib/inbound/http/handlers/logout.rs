use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::account::ports::AuthServicePort;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Revoke the presented token. Tokens that no longer verify are accepted as
/// already logged out.
pub async fn logout<AS: AuthServicePort>(
    State(state): State<AppState<AS>>,
    headers: HeaderMap,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let token = bearer_token(&headers).map_err(ApiError::Unauthorized)?;

    state
        .auth_service
        .logout(token)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData {
            message: "logged out".to_string(),
        },
    ))
}
