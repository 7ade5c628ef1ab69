use thiserror::Error;

/// Why the status endpoint could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("status endpoint returned HTTP {0}")]
    Status(u16),

    #[error("status endpoint unreachable: {0}")]
    Transport(String),
}

/// Everything that can abort a single poll cycle.
///
/// None of these are fatal: the loop logs them and tries again after the
/// retry interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HomeworkError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("malformed status response: {0}")]
    Shape(String),

    #[error("homework record is missing `{0}`")]
    Field(&'static str),

    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),

    #[error("chat delivery failed: {0}")]
    Delivery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: HomeworkError = FetchError::Status(503).into();
        assert_eq!(err.to_string(), "status endpoint returned HTTP 503");
        assert!(matches!(err, HomeworkError::Fetch(FetchError::Status(503))));
    }

    #[test]
    fn test_field_error_names_the_field() {
        let err = HomeworkError::Field("homework_name");
        assert_eq!(err.to_string(), "homework record is missing `homework_name`");
    }
}
