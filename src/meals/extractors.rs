use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

const HYPHENATED_UUID_LEN: usize = 36;

/// `:meal_id` path segment; only the hyphenated UUID form is accepted.
#[derive(Debug, Clone, Copy)]
pub struct MealId(pub Uuid);

impl MealId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::validation("mealId", "Invalid uuid");
        if raw.len() != HYPHENATED_UUID_LEN {
            return Err(invalid());
        }
        Uuid::try_parse(raw).map(MealId).map_err(|_| invalid())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MealId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation("mealId", e.body_text()))?;
        MealId::parse(&raw)
    }
}
