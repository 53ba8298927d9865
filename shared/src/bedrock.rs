//! Bedrock Runtime client for Titan text generation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Config, GenerationConfig};
use crate::{Error, Result};

/// Something that turns a prompt into candidate completions.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation request. No retries are attempted.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult>;
}

/// Titan `InvokeModel` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    text_generation_config: TextGenerationConfig<'a>,
}

// No top_k here; see GenerationConfig::top_k.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig<'a> {
    max_token_count: u32,
    stop_sequences: &'a [String],
    temperature: f64,
    top_p: f64,
}

/// Serialize the request body for a prompt.
pub fn request_body(prompt: &str, config: &GenerationConfig) -> Result<Vec<u8>> {
    let request = TitanRequest {
        input_text: prompt,
        text_generation_config: TextGenerationConfig {
            max_token_count: config.max_token_count,
            stop_sequences: &config.stop_sequences,
            temperature: config.temperature,
            top_p: config.top_p,
        },
    };

    Ok(serde_json::to_vec(&request)?)
}

/// Titan `InvokeModel` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub input_text_token_count: Option<u32>,
    pub results: Vec<Candidate>,
}

/// One generated completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub output_text: String,
    pub token_count: Option<u32>,
    pub completion_reason: Option<String>,
}

impl GenerationResult {
    /// Text of the first candidate. Later candidates are ignored.
    pub fn first_output_text(&self) -> Result<&str> {
        self.results
            .first()
            .map(|c| c.output_text.as_str())
            .ok_or(Error::EmptyResult)
    }
}

/// Text generator backed by Bedrock `InvokeModel`.
pub struct BedrockTextGenerator {
    client: BedrockClient,
    model_id: String,
}

impl BedrockTextGenerator {
    /// Create a generator with a pre-built Bedrock client.
    pub fn new(client: BedrockClient, config: &Config) -> Self {
        Self {
            client,
            model_id: config.model_id.clone(),
        }
    }

    /// Build a Bedrock client for the configured region.
    ///
    /// Credentials come from the default provider chain.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(BedrockClient::new(&sdk_config), config)
    }
}

#[async_trait]
impl TextGenerator for BedrockTextGenerator {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult> {
        info!(model_id = %self.model_id, "Invoking Bedrock model");

        let body = request_body(prompt, config)?;

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("*/*")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to invoke model: {}", e)))?;

        let result: GenerationResult = serde_json::from_slice(response.body().as_ref())?;

        info!(
            result = ?result,
            input_tokens = ?result.input_text_token_count,
            candidates = result.results.len(),
            "Bedrock model responded"
        );

        Ok(result)
    }
}
