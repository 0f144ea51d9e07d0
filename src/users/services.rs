use axum::http::{header, HeaderMap, HeaderValue};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{AppError, StoreError};
use crate::state::AppState;
use crate::users::dto::CreateUserRequest;
use crate::users::repo_types::{NewUser, User};

pub const USER_EXISTS: &str = "User already exists";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// First non-empty value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| key.trim() == name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value that binds `token` to the whole site for `max_age_secs`.
pub fn session_cookie(cfg: &SessionConfig, token: &str) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        cfg.cookie_name, token, cfg.max_age_secs
    );
    if cfg.secure {
        cookie.push_str("; Secure");
    }
    match HeaderValue::from_str(&cookie) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "session cookie is not a valid header value");
            None
        }
    }
}

/// Session token a registration binds to, plus the cookie to send when it was minted here.
#[derive(Debug)]
pub struct ResolvedSession {
    pub token: String,
    pub set_cookie: Option<HeaderValue>,
}

pub fn resolve_session(headers: &HeaderMap, cfg: &SessionConfig) -> ResolvedSession {
    if let Some(token) = read_cookie(headers, &cfg.cookie_name) {
        return ResolvedSession {
            token,
            set_cookie: None,
        };
    }
    let token = Uuid::new_v4().to_string();
    debug!("issuing new session token");
    ResolvedSession {
        set_cookie: session_cookie(cfg, &token),
        token,
    }
}

pub async fn register_user(
    state: &AppState,
    session_token: &str,
    body: CreateUserRequest,
) -> Result<User, AppError> {
    let body = body.normalized();

    if state.users.find_by_email(&body.email).await?.is_some() {
        warn!(email = %body.email, "email already registered");
        return Err(AppError::Conflict(USER_EXISTS));
    }

    let new_user = NewUser {
        id: Uuid::new_v4(),
        session_token: session_token.to_string(),
        name: body.name,
        email: body.email,
    };

    match state.users.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(user)
        }
        // Lost the race against a concurrent registration of the same email.
        Err(StoreError::UniqueViolation(constraint)) => {
            warn!(%constraint, "email registered concurrently");
            Err(AppError::Conflict(USER_EXISTS))
        }
        Err(e) => Err(e.into()),
    }
}
