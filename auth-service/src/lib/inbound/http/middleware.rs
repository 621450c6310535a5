use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::account::models::UserId;
use crate::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

/// Middleware that admits only unrevoked, verifiable bearer tokens.
///
/// The revocation check runs first and fails closed: if the ledger cannot
/// be consulted the request is denied with 500.
pub async fn require_bearer<AS: AuthServicePort>(
    State(state): State<AppState<AS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Owned: the request body is not Sync, so no borrow of it may cross an await.
    let token = bearer_token(req.headers())
        .map_err(|msg| ApiError::Unauthorized(msg).into_response())?
        .to_string();

    let revoked = state
        .auth_service
        .is_revoked(&token)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    if revoked {
        return Err(ApiError::Unauthorized("token revoked".to_string()).into_response());
    }

    let claims = state.auth_service.parse_claims(&token).map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        ApiError::Unauthorized("invalid or expired token".to_string()).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.user_id),
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, String> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err("Invalid Authorization header format. Expected: Bearer <token>".to_string()),
    }
}
