use anyhow::Result;
use shared::Role;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, warn};

use crate::models::{NewUser, User};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('user', 'admin'))
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        sku TEXT NOT NULL UNIQUE,
        price REAL NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        stock INTEGER NOT NULL DEFAULT 0,
        in_stock INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id),
        total_amount REAL NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL,
        unit_price REAL NOT NULL
    )",
];

/// Account created on first start when the users table is empty.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// In-memory databases live per connection, so they get a single one that never expires.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };
    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool, bootstrap: Option<&AdminBootstrap>) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }

    if User::count(pool).await? > 0 {
        return Ok(());
    }
    match bootstrap {
        Some(admin) => {
            let password_hash = bcrypt::hash(&admin.password, admin.bcrypt_cost)?;
            User::create(
                pool,
                NewUser {
                    email: admin.email.clone(),
                    password_hash,
                    role: Role::Admin,
                },
            )
            .await?;
            info!("Initial admin account {} created", admin.email);
        }
        None => warn!("No users and no ADMIN_PASSWORD set: nobody can manage products"),
    }
    Ok(())
}
