use crate::config::AppConfig;
use crate::db;
use crate::meals::repo::{MealRepo, PgMealRepo};
use crate::users::repo::{PgUserRepo, UserRepo};
use std::sync::Arc;

/// Shared handler state; persistence is reached only through the repo traits.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub meals: Arc<dyn MealRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        Ok(Self::from_parts(
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgMealRepo::new(pool)),
            Arc::new(config),
        ))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepo>,
        meals: Arc<dyn MealRepo>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            meals,
            config,
        }
    }
}
