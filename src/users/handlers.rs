use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    state::AppState,
    users::{
        dto::CreateUserRequest,
        services::{register_user, resolve_session},
    },
    validation::ValidJson,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/", post(register))
}

/// POST /users
///
/// The session cookie is resolved before the body is looked at, so a freshly minted cookie is
/// sent back even when the body is rejected or the email is taken.
#[instrument(skip(state, headers, payload))]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<ValidJson<CreateUserRequest>, AppError>,
) -> Response {
    let session = resolve_session(&headers, &state.config.session);

    let outcome = match payload {
        Ok(ValidJson(body)) => register_user(&state, &session.token, body).await,
        Err(e) => Err(e),
    };

    let mut response = match outcome {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(e) => e.into_response(),
    };
    if let Some(cookie) = session.set_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
