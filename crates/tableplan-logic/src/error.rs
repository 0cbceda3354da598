//! Errors that abort an assignment run before any table is placed.
//!
//! Running out of tables is not an error; it shows up in the run report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::geometry::ValidationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {}", join(.0))]
    InvalidConfig(Vec<ConfigError>),
    #[error("invalid floor plan: {}", join(.0))]
    InvalidPlan(Vec<ValidationError>),
    #[error("reservation {reservation_id} has no guests")]
    InvalidPartySize { reservation_id: String },
    #[error("reservation id {0} appears more than once")]
    DuplicateReservation(String),
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Severity;

    #[test]
    fn test_messages() {
        let err = EngineError::InvalidPlan(vec![ValidationError {
            category: "room_geometry",
            severity: Severity::Error,
            message: "Room has non-positive dimensions: 0×600".into(),
        }]);
        assert_eq!(
            err.to_string(),
            "invalid floor plan: [room_geometry] Room has non-positive dimensions: 0×600"
        );
        let err = EngineError::InvalidPartySize {
            reservation_id: "r7".into(),
        };
        assert_eq!(err.to_string(), "reservation r7 has no guests");
    }
}
