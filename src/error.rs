use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Validation(String),
    #[error("User not found.")]
    NotFound,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    EmptyResult(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn malformed<T: Into<String>>(msg: T) -> Self {
        AppError::MalformedRecord(msg.into())
    }

    pub fn empty<T: Into<String>>(msg: T) -> Self {
        AppError::EmptyResult(msg.into())
    }

    /// Upstream answered, but with a status the caller cannot use.
    pub fn upstream_status(status: reqwest::StatusCode) -> Self {
        AppError::Network(format!("API error: {}", status.as_u16()))
    }

    /// Connection-level failure. The request URL is stripped before it can reach a user.
    pub fn network(err: reqwest::Error) -> Self {
        AppError::Network(format!("Network error: {}", err.without_url()))
    }

    /// Errors whose message is safe to show to the person who asked for a chart.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound
                | AppError::Network(_)
                | AppError::EmptyResult(_)
        )
    }
}
