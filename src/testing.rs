//! In-memory repos and request helpers for router-level tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::build_app;
use crate::config::{AppConfig, SessionConfig};
use crate::error::StoreError;
use crate::meals::repo::MealRepo;
use crate::meals::repo_types::{Meal, MealInput};
use crate::state::AppState;
use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User};

/// Users are kept next to the session token they registered with, in registration order.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<(String, User)>>,
    meals: Mutex<Vec<Meal>>,
    meal_queries: AtomicUsize,
}

impl MemoryStore {
    /// In insertion order.
    pub fn users(&self) -> Vec<User> {
        let users = self.users.lock().unwrap();
        users.iter().map(|(_, user)| user.clone()).collect()
    }

    pub fn session_token_of(&self, user_id: Uuid) -> Option<String> {
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|(_, user)| user.id == user_id)
            .map(|(token, _)| token.clone())
    }

    pub fn meals(&self) -> Vec<Meal> {
        self.meals.lock().unwrap().clone()
    }

    /// Number of calls that reached the meal repo.
    pub fn meal_queries(&self) -> usize {
        self.meal_queries.load(Ordering::SeqCst)
    }

    pub fn seed_user(&self, name: &str, email: &str, session_token: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
        };
        self.users
            .lock()
            .unwrap()
            .push((session_token.into(), user.clone()));
        user
    }

    fn touch_meals(&self) {
        self.meal_queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .map(|(_, user)| user)
            .find(|u| u.email == email)
            .cloned())
    }

    /// Earliest registration wins, like `ORDER BY created_at` in Postgres.
    async fn find_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, user)| user.clone()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(_, u)| u.email == new_user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        let user = User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
        };
        users.push((new_user.session_token, user.clone()));
        Ok(user)
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn create(&self, id: Uuid, user_id: Uuid, input: MealInput) -> Result<Meal, StoreError> {
        self.touch_meals();
        let now = OffsetDateTime::now_utc();
        let meal = Meal {
            id,
            user_id,
            name: input.name,
            description: input.description,
            is_on_diet: input.is_on_diet,
            date: input.date,
            created_at: now,
            updated_at: now,
        };
        self.meals.lock().unwrap().push(meal.clone());
        Ok(meal)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Meal>, StoreError> {
        self.touch_meals();
        let mut owned: Vec<Meal> = self
            .meals
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(owned)
    }

    async fn find_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>, StoreError> {
        self.touch_meals();
        let meals = self.meals.lock().unwrap();
        Ok(meals
            .iter()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .cloned())
    }

    async fn update_for_user(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        input: MealInput,
    ) -> Result<bool, StoreError> {
        self.touch_meals();
        let mut meals = self.meals.lock().unwrap();
        let Some(meal) = meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
        else {
            return Ok(false);
        };
        meal.name = input.name;
        meal.description = input.description;
        meal.is_on_diet = input.is_on_diet;
        meal.date = input.date;
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }

    async fn delete_for_user(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError> {
        self.touch_meals();
        let mut meals = self.meals.lock().unwrap();
        let before = meals.len();
        meals.retain(|m| !(m.id == meal_id && m.user_id == user_id));
        Ok(meals.len() < before)
    }
}

/// Sees no existing email but loses the insert, as a concurrent registration would.
pub struct RacingUserRepo;

#[async_trait]
impl UserRepo for RacingUserRepo {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_by_session_token(&self, _token: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::UniqueViolation("users_email_key".into()))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        session: SessionConfig::default(),
    }
}

pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::from_parts(store.clone(), store.clone(), Arc::new(test_config()));
    (build_app(state), store)
}

/// Like `test_app`, with user persistence swapped out.
pub fn test_app_with(users: Arc<dyn UserRepo>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::from_parts(users, store.clone(), Arc::new(test_config()));
    (build_app(state), store)
}

fn builder(method: Method, uri: &str, session: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match session {
        Some(token) => builder.header(header::COOKIE, format!("sessionId={token}")),
        None => builder,
    }
}

pub fn json_request(method: Method, uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
    builder(method, uri, session)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, session: Option<&str>) -> Request<Body> {
    builder(method, uri, session).body(Body::empty()).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Value::Null` for empty bodies.
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Token carried by the `Set-Cookie` header, if one was sent.
    pub fn session_token(&self) -> Option<String> {
        let cookie = self.set_cookie()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix("sessionId=").map(str::to_string)
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    TestResponse {
        status,
        headers,
        body,
    }
}
