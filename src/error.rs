use thiserror::Error;

/// Errors surfaced by a planning run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Malformed day bounds or slot duration.
    #[error("invalid time range: start={start}, end={end} ({reason})")]
    InvalidRange { start: f64, end: f64, reason: String },

    /// At least one teacher, one class and one room are required.
    #[error(
        "insufficient resources: need at least one teacher, one class and one room \
         (got {teachers} teachers, {classes} classes, {rooms} rooms)"
    )]
    InsufficientResources {
        teachers: usize,
        classes: usize,
        rooms: usize,
    },

    /// Resource data rejected before scheduling.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Unexpected internal fault, carrying the original message.
    #[error("planning generation failed: {0}")]
    Generation(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

impl ScheduleError {
    pub(crate) fn invalid_range(start: f64, end: f64, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidRange {
            start,
            end,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScheduleError::invalid_range(10.0, 8.0, "start must be before end");
        let msg = err.to_string();
        assert!(msg.contains("start=10"));
        assert!(msg.contains("start must be before end"));

        let err = ScheduleError::InsufficientResources {
            teachers: 1,
            classes: 2,
            rooms: 0,
        };
        assert!(err.to_string().contains("0 rooms"));

        let err = ScheduleError::Generation("boom".to_string());
        assert!(err.to_string().ends_with("boom"));
    }
}
