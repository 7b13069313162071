use serde::Deserialize;
use shared::{Identity, Role};
use sqlx::{FromRow, SqlitePool};

use super::AppError;

/// Stored account. Never serialized: responses expose [`Identity`] only.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Login and registration body. Any `role` field sent by the client is ignored.
#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let email = self.normalized_email();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation_error("email", "must be a valid email address"));
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(AppError::validation_error(
                "password",
                &format!("must be at least {} characters", Self::MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

impl User {
    pub fn role(&self) -> Result<Role, AppError> {
        self.role.parse::<Role>().map_err(|e| {
            AppError::InternalServerError(format!("User {} has {}", self.id, e))
        })
    }

    pub fn identity(&self) -> Result<Identity, AppError> {
        Ok(Identity::new(self.id, self.email.clone(), self.role()?))
    }

    pub async fn read_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn read_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn read_all(pool: &SqlitePool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &SqlitePool, new_user: NewUser) -> sqlx::Result<Self> {
        let sql = "INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?) RETURNING *";
        sqlx::query_as::<_, Self>(sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn update_role(pool: &SqlitePool, id: i64, role: Role) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("UPDATE users SET role = ? WHERE id = ? RETURNING *")
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
