//! Error type for booking operations.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("invalid genre id: {0:?}")]
    InvalidGenreId(String),

    #[error("invalid start time: {0:?}")]
    InvalidStartTime(String),

    #[error("invalid form: {0}")]
    Validation(String),

    #[error("{entity} named {name:?} already exists")]
    DuplicateName { entity: &'static str, name: String },
}

impl BookingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookingError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = BookingError::NotFound {
            entity: "venue",
            id: 42,
        };
        assert_eq!(err.to_string(), "venue 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_invalid_genre_id() {
        let err = BookingError::InvalidGenreId("rock".into());
        assert_eq!(err.to_string(), "invalid genre id: \"rock\"");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_display_duplicate_name() {
        let err = BookingError::DuplicateName {
            entity: "artist",
            name: "Guns N Petals".into(),
        };
        assert_eq!(
            err.to_string(),
            "artist named \"Guns N Petals\" already exists"
        );
    }

    #[test]
    fn test_from_db_err() {
        let err: BookingError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, BookingError::Database(_)));
        assert!(err.to_string().starts_with("database error:"));
    }
}
