use club_server_domain::{
    ServiceError, ServiceResult,
    user::{NewUser, User, UserRepository},
};
use sqlx::{
    Row,
    AnyPool,
    any::AnyRow,
};

use crate::map_db_error;

pub struct SqlUserRepository {
    pool: AnyPool,
}

impl SqlUserRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &AnyRow) -> sqlx::Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    async fn get_user_by(&self, column: &str, value: &str) -> ServiceResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT id, username, email, password_hash FROM users WHERE {} = $1",
            column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;
        row.as_ref()
            .map(Self::user_from_row)
            .transpose()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }
}

#[async_trait::async_trait]
impl UserRepository for SqlUserRepository {
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        })
    }

    async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        self.get_user_by("username", username).await
    }

    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        self.get_user_by("email", email).await
    }
}
