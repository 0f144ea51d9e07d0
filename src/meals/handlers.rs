use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::AppError,
    meals::{
        dto::{MealEnvelope, MealMetrics, MealRequest},
        extractors::MealId,
        repo_types::Meal,
        services::summarize,
    },
    state::AppState,
    users::extractors::SessionUser,
    validation::ValidJson,
};

const MEAL_NOT_FOUND: &str = "Meal not found";

// SessionUser comes first in every signature so a bad session is rejected before the path
// or body is read.
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/", get(list_meals).post(create_meal))
        // "metrics" shadows the id route; its other verbs still answer like a bad meal id.
        .route(
            "/meals/metrics",
            get(meal_metrics)
                .put(metrics_as_meal_id)
                .delete(metrics_as_meal_id),
        )
        .route(
            "/meals/:meal_id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    ValidJson(body): ValidJson<MealRequest>,
) -> Result<StatusCode, AppError> {
    let meal = state
        .meals
        .create(Uuid::new_v4(), user.id, body.into_input())
        .await?;
    info!(meal_id = %meal.id, "meal created");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<Vec<Meal>>, AppError> {
    let meals = state.meals.list_by_user(user.id).await?;
    Ok(Json(meals))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
) -> Result<Json<MealEnvelope>, AppError> {
    state
        .meals
        .find_for_user(user.id, meal_id)
        .await?
        .map(|meal| Json(MealEnvelope { meal }))
        .ok_or(AppError::NotFound(MEAL_NOT_FOUND))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
    ValidJson(body): ValidJson<MealRequest>,
) -> Result<StatusCode, AppError> {
    if !state
        .meals
        .update_for_user(user.id, meal_id, body.into_input())
        .await?
    {
        return Err(AppError::NotFound(MEAL_NOT_FOUND));
    }
    info!(%meal_id, "meal updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
) -> Result<StatusCode, AppError> {
    if !state.meals.delete_for_user(user.id, meal_id).await? {
        return Err(AppError::NotFound(MEAL_NOT_FOUND));
    }
    info!(%meal_id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn meal_metrics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealMetrics>, AppError> {
    let meals = state.meals.list_by_user(user.id).await?;
    Ok(Json(summarize(&meals)))
}

async fn metrics_as_meal_id(_user: SessionUser) -> Result<StatusCode, AppError> {
    MealId::parse("metrics")?;
    Err(AppError::NotFound(MEAL_NOT_FOUND))
}
