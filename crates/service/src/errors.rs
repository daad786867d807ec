use models::errors::{FieldError, ModelError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub const DUPLICATE_TITLE: &str = "a task with this title already exists";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn duplicate_title() -> Self { Self::Conflict(DUPLICATE_TITLE.into()) }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(fields) => Self::Validation(fields),
            ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        // `title` carries the only unique index on the table
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::duplicate_title(),
            _ => Self::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::task::{self, validate_new};

    #[tokio::test]
    async fn unique_index_violation_maps_to_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        task::create(&db, validate_new("Only once", None)?).await?;

        // bypasses the repository's title check, so only the index can refuse it
        let err = task::create(&db, validate_new("Only once", None)?).await.unwrap_err();
        let mapped = ServiceError::from(err);
        assert!(matches!(mapped, ServiceError::Conflict(ref msg) if msg == DUPLICATE_TITLE), "{mapped:?}");
        Ok(())
    }

    #[test]
    fn other_db_errors_stay_internal() {
        let mapped = ServiceError::from(DbErr::Custom("disk full".into()));
        assert!(matches!(mapped, ServiceError::Db(_)));
    }
}
