use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;

pub const DEFAULT_COOKIE_NAME: &str = "sessionId";
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// How the session cookie is named and issued.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.into(),
            max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            secure: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;

        let session = SessionConfig {
            cookie_name: lookup("SESSION_COOKIE_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.into()),
            max_age_secs: parsed(&lookup, "SESSION_MAX_AGE_SECS")
                .unwrap_or(DEFAULT_SESSION_MAX_AGE_SECS),
            secure: parsed(&lookup, "SESSION_COOKIE_SECURE").unwrap_or(false),
        };

        Ok(Self {
            database_url,
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed(&lookup, "APP_PORT").unwrap_or(8080),
            session,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Unset or unparseable values read as `None` so the caller's default applies.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
