use axum::http::StatusCode;

/// Input rejected before any collection is touched.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("activity name must not be empty")]
    EmptyName,

    #[error("value is not a number: {0:?}")]
    InvalidValue(String),

    #[error("value must not be negative: {0}")]
    NegativeValue(f64),

    #[error("unknown activity type: {0:?}")]
    UnknownType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("changes kept in memory but not persisted: {0}")]
    Storage(#[from] StoreError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(err) => err.into(),
            TrackerError::Storage(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
