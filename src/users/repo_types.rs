use sqlx::FromRow;
use uuid::Uuid;

/// User record in the database. The session token and timestamps stay in the table; the token is
/// only ever matched in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub session_token: String,
    pub name: String,
    pub email: String,
}
