use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use shared_models::error::AppError;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl From<mongodb::error::Error> for DatabaseError {
    fn from(err: mongodb::error::Error) -> Self {
        let duplicate = matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
        );

        if duplicate {
            DatabaseError::DuplicateKey(err.to_string())
        } else {
            DatabaseError::Query(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for DatabaseError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        DatabaseError::Query(format!("serialization: {}", err))
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateKey(msg) => AppError::Conflict(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_app_error_mapping() {
        let conflict: AppError = DatabaseError::DuplicateKey("email".to_string()).into();
        assert_matches!(conflict, AppError::Conflict(_));

        let down: AppError = DatabaseError::Connection("refused".to_string()).into();
        assert_matches!(down, AppError::Database(msg) if msg.contains("refused"));
    }
}
