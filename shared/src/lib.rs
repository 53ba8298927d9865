//! Shared library for the Lex fallback Lambda.
//!
//! Maps Amazon Lex V2 fallback-intent events onto a Bedrock Titan text model
//! and shapes the completion back into a Lex response.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod fallback;
pub mod lex;

pub use bedrock::{BedrockTextGenerator, Candidate, GenerationResult, TextGenerator};
pub use config::{Config, GenerationConfig};
pub use error::{Error, Result};
pub use fallback::{handle_event, HandlerOutcome};
pub use lex::{FallbackRequest, LexResponse};
