//! Fallback intent handling: Lex event in, Lex response (or nothing) out.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::bedrock::TextGenerator;
use crate::config::Config;
use crate::lex::{self, FallbackRequest, LexResponse};
use crate::Result;

/// What the handler did with an event.
///
/// `NotHandled` serializes to `null`, which tells Lex the code hook had
/// nothing to say for this intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HandlerOutcome {
    Handled(LexResponse),
    NotHandled,
}

/// Answer a fallback turn with the model's first completion.
///
/// Events for any other intent are ignored without contacting the model.
pub async fn handle_event(
    event: &Value,
    generator: &dyn TextGenerator,
    config: &Config,
) -> Result<HandlerOutcome> {
    if !lex::is_fallback(event) {
        debug!(intent = %lex::intent_name(event), "Not a fallback intent, skipping");
        return Ok(HandlerOutcome::NotHandled);
    }

    let request = FallbackRequest::from_event(event)?;
    info!(prompt = %request.input_transcript, "Handling fallback intent");

    let result = generator
        .generate(&request.input_transcript, &config.generation)
        .await?;
    let output_text = result.first_output_text()?.to_string();

    info!(output_text = %output_text, "Closing fallback turn");

    Ok(HandlerOutcome::Handled(LexResponse::close_fulfilled(
        request,
        output_text,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bedrock::{Candidate, GenerationResult};
    use crate::config::GenerationConfig;
    use crate::Error;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Generator that returns canned candidates and records every call.
    struct FakeGenerator {
        outputs: Vec<String>,
        calls: Mutex<Vec<(String, GenerationConfig)>>,
    }

    impl FakeGenerator {
        fn returning(outputs: &[&str]) -> Self {
            Self {
                outputs: outputs.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, GenerationConfig)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(
            &self,
            prompt: &str,
            config: &GenerationConfig,
        ) -> Result<GenerationResult> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), config.clone()));

            Ok(GenerationResult {
                input_text_token_count: Some(8),
                results: self
                    .outputs
                    .iter()
                    .map(|text| Candidate {
                        output_text: text.clone(),
                        token_count: None,
                        completion_reason: Some("FINISH".to_string()),
                    })
                    .collect(),
            })
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _: &str, _: &GenerationConfig) -> Result<GenerationResult> {
            Err(Error::Aws("AccessDeniedException".to_string()))
        }
    }

    fn fallback_event() -> Value {
        json!({
            "inputTranscript": "What is the capital of France?",
            "sessionState": {
                "intent": {"name": "FallbackIntent", "slots": {}},
                "sessionAttributes": {"foo": "bar"}
            }
        })
    }

    #[tokio::test]
    async fn test_other_intents_are_not_handled() {
        let generator = FakeGenerator::returning(&["unused"]);
        let config = Config::default();

        for event in [
            json!({"sessionState": {"intent": {"name": "OrderFlowers", "slots": {}}}}),
            json!({"sessionState": {}}),
            json!({}),
        ] {
            let outcome = handle_event(&event, &generator, &config).await.unwrap();
            assert_eq!(outcome, HandlerOutcome::NotHandled);
        }

        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_answered_by_model() {
        let generator = FakeGenerator::returning(&["Paris is the capital of France.", "Lyon"]);
        let config = Config::default();

        let outcome = handle_event(&fallback_event(), &generator, &config)
            .await
            .unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "What is the capital of France?");
        assert_eq!(calls[0].1, GenerationConfig::default());

        let HandlerOutcome::Handled(response) = outcome else {
            panic!("fallback event should be handled");
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "sessionState": {
                    "dialogAction": {"type": "Close"},
                    "intent": {"name": "FallbackIntent", "slots": {}, "state": "Fulfilled"},
                    "sessionAttributes": {"foo": "bar"}
                },
                "messages": [
                    {"contentType": "PlainText", "content": "Paris is the capital of France."}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_empty_results_propagate() {
        let generator = FakeGenerator::returning(&[]);

        let err = handle_event(&fallback_event(), &generator, &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }

    #[tokio::test]
    async fn test_missing_transcript_skips_model() {
        let generator = FakeGenerator::returning(&["unused"]);
        let mut event = fallback_event();
        event.as_object_mut().unwrap().remove("inputTranscript");

        let err = handle_event(&event, &generator, &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generator_errors_propagate() {
        let err = handle_event(&fallback_event(), &FailingGenerator, &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Aws(ref msg) if msg == "AccessDeniedException"));
    }

    #[tokio::test]
    async fn test_identical_events_are_independent() {
        let generator = FakeGenerator::returning(&["Paris."]);
        let config = Config::default();
        let event = fallback_event();

        let first = handle_event(&event, &generator, &config).await.unwrap();
        let second = handle_event(&event, &generator, &config).await.unwrap();
        assert_eq!(first, second);

        let HandlerOutcome::Handled(mut first) = first else {
            panic!("fallback event should be handled");
        };
        first.session_state.session_attributes["foo"] = json!("changed");
        first.messages[0].content.push_str(" (edited)");

        let HandlerOutcome::Handled(second) = second else {
            panic!("fallback event should be handled");
        };
        assert_eq!(second.session_state.session_attributes, json!({"foo": "bar"}));
        assert_eq!(second.messages[0].content, "Paris.");
        assert_eq!(event["sessionState"]["sessionAttributes"], json!({"foo": "bar"}));
        assert_eq!(generator.calls().len(), 2);
    }

    #[test]
    fn test_not_handled_serializes_to_null() {
        assert_eq!(serde_json::to_value(HandlerOutcome::NotHandled).unwrap(), Value::Null);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_prompt_and_output_are_logged() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let generator = FakeGenerator::returning(&["Paris."]);
        handle_event(&fallback_event(), &generator, &Config::default())
            .await
            .unwrap();

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("What is the capital of France?"));
        assert!(logs.contains("Paris."));
    }
}
