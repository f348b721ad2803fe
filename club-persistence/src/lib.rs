use std::sync::Arc;

use chrono::NaiveDate;
use club_server_domain::{
    ServiceError, ServiceResult, app::Repositories, diagnostics::StorageProbe, util::DATE_FORMAT,
};
use log::{error, info};
use sqlx::{
    AnyPool,
    any::{AnyPoolOptions, install_default_drivers},
    error::ErrorKind,
};

use crate::{
    config::{Backend, mask_credentials},
    players::SqlPlayerRepository,
    statistics::SqlStatisticRepository,
    users::SqlUserRepository,
};

pub mod config;
pub mod players;
pub mod schema;
pub mod statistics;
pub mod users;

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
    url: String,
    backend: Backend,
}

impl Database {
    pub async fn connect(url: &str) -> ServiceResult<Self> {
        install_default_drivers();
        let backend = Backend::from_url(url);

        // every in-memory SQLite connection is its own database
        let options = if url.contains(":memory:") || url.contains("mode=memory") {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(5)
        };
        let pool = options.connect(url).await.map_err(map_db_error)?;

        info!("Connected to {}", mask_credentials(url));
        Ok(Self {
            pool,
            url: url.to_string(),
            backend,
        })
    }

    pub async fn ensure_schema(&self) -> ServiceResult<()> {
        for statement in schema::statements(self.backend) {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;
        }
        Ok(())
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            user_repository: Arc::new(Box::new(SqlUserRepository::new(self.pool.clone()))),
            player_repository: Arc::new(Box::new(SqlPlayerRepository::new(self.pool.clone()))),
            statistic_repository: Arc::new(Box::new(SqlStatisticRepository::new(
                self.pool.clone(),
            ))),
            storage_probe: Arc::new(Box::new(self.clone())),
        }
    }
}

#[async_trait::async_trait]
impl StorageProbe for Database {
    async fn probe(&self) -> ServiceResult<()> {
        self.ensure_schema().await?;
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    fn describe(&self) -> String {
        mask_credentials(&self.url)
    }
}

/// Translates constraint violations into domain errors. The violated unique
/// column is read from the driver message or constraint name.
pub(crate) fn map_db_error(e: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                let detail = format!(
                    "{} {}",
                    db_err.message(),
                    db_err.constraint().unwrap_or_default()
                );
                if detail.contains("email") {
                    return ServiceError::DuplicateEmail;
                }
                if detail.contains("username") {
                    return ServiceError::DuplicateUser;
                }
            }
            ErrorKind::ForeignKeyViolation => {
                return ServiceError::InvalidReference(db_err.message().to_string());
            }
            _ => {}
        }
    }
    error!("Storage error: {}", e);
    ServiceError::Storage(e.to_string())
}

pub(crate) fn date_to_db(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn date_from_db(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| ServiceError::Storage(format!("Invalid stored date {}: {}", value, e)))
}

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.ensure_schema().await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert!(db.probe().await.is_ok());
        assert_eq!(db.describe(), "sqlite::memory:");
        // schema creation is idempotent
        assert!(db.probe().await.is_ok());
    }
}
