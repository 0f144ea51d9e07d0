use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal row, serialized as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: i64, // epoch milliseconds
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Writable fields of a meal; used for both create and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealInput {
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: i64,
}
