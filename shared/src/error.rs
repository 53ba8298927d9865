//! Error types for the Lex fallback Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while bridging a Lex event to Bedrock.
///
/// None of these are recovered from locally. They propagate to the Lambda
/// runtime, which reports them to Lex as an invocation failure.
#[derive(Error, Debug)]
pub enum Error {
    /// A field the fallback branch needs is absent from the inbound event
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A field is present but has the wrong JSON type
    #[error("Validation error: {0}")]
    Validation(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The model returned no candidate outputs
    #[error("Model returned no results")]
    EmptyResult,
}
