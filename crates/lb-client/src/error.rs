use thiserror::Error;

/// Failures surfaced to the page. Every non-OK response counts as a network
/// error; 4xx and 5xx are not told apart.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("local storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<lb_core::AppError> for ClientError {
    fn from(err: lb_core::AppError) -> Self {
        ClientError::Network(err.to_string())
    }
}
