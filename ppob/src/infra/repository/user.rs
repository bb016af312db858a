use crate::domain::model::{NewUser, User};
use crate::domain::repository::{self, StoreError};
use crate::infra::repository::is_unique_violation;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct PgUserRepository {
    pub pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgUserRepository { pool }
    }
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, password_hash, profile_image";

#[async_trait]
impl repository::UserRepository for PgUserRepository {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query(&format!(
            "INSERT INTO users(email, first_name, last_name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                anyhow::Error::new(StoreError::DuplicateEmail(user.email.clone()))
            } else {
                anyhow::Error::new(err).context("insert user")
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn update_profile(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "UPDATE users SET first_name = $1, last_name = $2 WHERE email = $3 RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn update_profile_image(&self, email: &str, image: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "UPDATE users SET profile_image = $1 WHERE email = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(image)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }
}
