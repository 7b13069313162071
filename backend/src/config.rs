use anyhow::{Context, Result};
use std::env::var;

use crate::auth::TokenSettings;
use crate::system::AdminBootstrap;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret: String,
    pub port: u16,
    pub token_ttl_minutes: i64,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let secret = var("SECRET").context("SECRET environment variable must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("SECRET environment variable must not be empty");
        }
        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
            secret,
            port: parse_or("PORT", 3000)?,
            token_ttl_minutes: token_ttl_minutes(parse_or(
                "TOKEN_TTL_MINUTES",
                TokenSettings::DEFAULT_TTL_MINUTES,
            )?)?,
            admin_email: var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn token_settings(&self) -> Result<TokenSettings> {
        let ttl = chrono::Duration::try_minutes(token_ttl_minutes(self.token_ttl_minutes)?)
            .context("TOKEN_TTL_MINUTES does not fit in a duration")?;
        Ok(TokenSettings::new(self.secret.clone(), ttl))
    }

    pub fn admin_bootstrap(&self) -> Option<AdminBootstrap> {
        self.admin_password.as_ref().map(|password| AdminBootstrap {
            email: self.admin_email.trim().to_lowercase(),
            password: password.clone(),
            bcrypt_cost: self.bcrypt_cost,
        })
    }
}

/// Token lifetimes must be positive and at most [`TokenSettings::MAX_TTL_MINUTES`].
fn token_ttl_minutes(minutes: i64) -> Result<i64> {
    if !(1..=TokenSettings::MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!(
            "TOKEN_TTL_MINUTES must be between 1 and {}, got {}",
            TokenSettings::MAX_TTL_MINUTES,
            minutes
        );
    }
    Ok(minutes)
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}
