use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::meals::repo_types::{Meal, MealInput};

/// Every lookup and mutation is scoped to the owning user; a meal owned by someone else
/// behaves exactly like a missing one.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn create(&self, id: Uuid, user_id: Uuid, input: MealInput) -> Result<Meal, StoreError>;

    /// Newest `date` first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Meal>, StoreError>;

    async fn find_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>, StoreError>;

    /// Returns `false` when no owned meal matched.
    async fn update_for_user(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        input: MealInput,
    ) -> Result<bool, StoreError>;

    /// Returns `false` when no owned meal matched.
    async fn delete_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn create(&self, id: Uuid, user_id: Uuid, input: MealInput) -> Result<Meal, StoreError> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, name, description, is_on_diet, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, is_on_diet, date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_on_diet)
        .bind(input.date)
        .fetch_one(&self.db)
        .await?;
        Ok(meal)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Meal>, StoreError> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, is_on_diet, date, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>, StoreError> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, is_on_diet, date, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(meal)
    }

    async fn update_for_user(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        input: MealInput,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE meals
               SET name = $3,
                   description = $4,
                   is_on_diet = $5,
                   date = $6,
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_on_diet)
        .bind(input.date)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
