use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Tokens may be shared by several users; the earliest registration wins.
    async fn find_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::UniqueViolation` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE session_token = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, session_token, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email
            "#,
        )
        .bind(user.id)
        .bind(&user.session_token)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}
