use thiserror::Error;

/// Failure of a single authentication API call.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status code.
    #[error("api responded with {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// A request body could not be serialized or a response body was not JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
