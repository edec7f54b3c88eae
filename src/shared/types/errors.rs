use thiserror::Error;

use crate::domain::booking::BookingError;
use crate::domain::review::ReviewError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Startup failures outside the domain
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let e = DomainError::not_found("Booking", 42);
        assert_eq!(e.to_string(), "Not found: Booking with id=42");
    }

    #[test]
    fn booking_errors_render_transparently() {
        let e: DomainError = BookingError::DateOrder.into();
        assert_eq!(e.to_string(), "Check-out date must be after check-in date.");
    }

    #[test]
    fn database_errors_keep_driver_message() {
        let e: DomainError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert!(matches!(e, DomainError::Database(_)));
        assert!(e.to_string().contains("connection reset"));
    }
}
