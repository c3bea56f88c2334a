//! Authentication-related handlers

use axum::{Extension, Json};
use serde::Serialize;

use crate::{AuthMethod, AuthUser};

/// Response for the /api/me endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// The acting user's id
    pub user_id: String,
    /// How the user was identified
    pub auth_method: AuthMethod,
}

/// GET /api/me - Get the current user
pub async fn get_me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
        auth_method: user.method,
    })
}
