use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo_types::User;
use crate::users::services::read_cookie;

/// Resolves the session cookie to its user, or rejects with 401.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config.session.cookie_name;
        let Some(token) = read_cookie(&parts.headers, cookie_name) else {
            warn!("missing session cookie");
            return Err(AppError::Unauthorized);
        };

        match state.users.find_by_session_token(&token).await? {
            Some(user) => {
                debug!(user_id = %user.id, name = %user.name, "session resolved");
                Ok(SessionUser(user))
            }
            None => {
                warn!("unknown session token");
                Err(AppError::Unauthorized)
            }
        }
    }
}
