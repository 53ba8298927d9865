//! Lex Fallback Lambda - Answers unmatched Lex utterances with a Bedrock model.
//!
//! Lex invokes this code hook on every turn. Only `FallbackIntent` turns are
//! answered; for any other intent the function returns `null`.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::{handle_event, lex, BedrockTextGenerator, Config, HandlerOutcome, TextGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    config: Config,
    generator: Box<dyn TextGenerator>,
}

impl AppState {
    async fn new() -> Self {
        let config = Config::default();
        let generator = BedrockTextGenerator::from_config(&config).await;

        info!(region = %config.region, model_id = %config.model_id, "Bedrock client ready");

        Self {
            config,
            generator: Box::new(generator),
        }
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<Value>,
) -> Result<HandlerOutcome, Error> {
    let (payload, context) = event.into_parts();

    info!(
        request_id = %context.request_id,
        intent = %lex::intent_name(&payload),
        "Processing Lex event"
    );

    let outcome = handle_event(&payload, state.generator.as_ref(), &state.config).await?;

    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await);

    run(service_fn(move |event| {
        let state = state.clone();
        async move { handler(state, event).await }
    }))
    .await
}
