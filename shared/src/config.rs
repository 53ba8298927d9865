//! Configuration for the Bedrock text model.
//!
//! Every value here is a fixed constant. Nothing is read from the inbound
//! event or the environment; the struct exists so tests can substitute their
//! own values and so the client receives its settings at construction.

/// Region the Bedrock runtime client is scoped to.
pub const REGION: &str = "us-east-1";

/// Titan text model invoked for fallback utterances.
pub const MODEL_ID: &str = "amazon.titan-text-express-v1";

/// Intent name Lex assigns to utterances it could not match.
pub const FALLBACK_INTENT: &str = "FallbackIntent";

/// Inference configuration handed to the text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// AWS region for the Bedrock runtime endpoint
    pub region: String,
    /// Bedrock model ID
    pub model_id: String,
    /// Sampling parameters sent with every request
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: REGION.to_string(),
            model_id: MODEL_ID.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Titan `textGenerationConfig` values.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub max_token_count: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub stop_sequences: Vec<String>,
    /// Top-k sampling cutoff.
    ///
    /// Kept for reference only: it is never sent to the model. Titan text
    /// models do not accept a `topK` parameter in `textGenerationConfig`.
    pub top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_token_count: 500,
            temperature: 1.0,
            top_p: 0.99,
            stop_sequences: Vec::new(),
            top_k: 250,
        }
    }
}
