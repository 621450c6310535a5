use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn profile(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<ProfileResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        ProfileResponseData {
            user_id: user.user_id.0,
            role: user.role.as_i32(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub user_id: i64,
    pub role: i32,
}
