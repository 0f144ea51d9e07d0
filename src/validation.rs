use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{AppError, FieldIssue};

/// Field-level checks that run after a body has deserialized.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldIssue>>;
}

/// `Json<T>` that also runs `T::validate` and reports every failure as a 400.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        if let Err(issues) = value.validate() {
            warn!(?issues, "request body rejected");
            return Err(AppError::Validation(issues));
        }
        Ok(ValidJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    warn!(error = %rejection.body_text(), "malformed json body");
    AppError::validation("body", rejection.body_text())
}

/// Pushes an issue when `value` is blank.
pub fn require_non_empty(issues: &mut Vec<FieldIssue>, field: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, "must not be empty"));
    }
}

pub fn finish(issues: Vec<FieldIssue>) -> Result<(), Vec<FieldIssue>> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
