use thiserror::Error;

#[derive(Debug, Error)]
pub enum EchoApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not deserialize response: {0}")]
    Decode(String),
    #[error("Query failed. Error {status}. {message}")]
    Query { status: u16, message: String },
    #[error("The remote API rejected the request: {0}")]
    Rejected(String),
}
