//! Amazon Lex V2 code hook events.
//!
//! The inbound event is kept as raw JSON so slots and session attributes can
//! be echoed back exactly as Lex sent them, including `null` values and slot
//! shapes this crate does not model.

use serde::Serialize;
use serde_json::Value;

use crate::config::FALLBACK_INTENT;
use crate::{Error, Result};

/// Name of the intent Lex resolved for this turn.
///
/// Returns an empty string when the event has no `sessionState.intent.name`.
pub fn intent_name(event: &Value) -> &str {
    event
        .pointer("/sessionState/intent/name")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Whether Lex routed this turn to the fallback intent.
pub fn is_fallback(event: &Value) -> bool {
    intent_name(event) == FALLBACK_INTENT
}

/// Session state pulled from a fallback event.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRequest {
    pub intent_name: String,
    /// Slot mapping, passed through untouched
    pub slots: Value,
    /// Session attributes, passed through untouched
    pub session_attributes: Value,
    /// What the user said
    pub input_transcript: String,
}

impl FallbackRequest {
    /// Extract the fields the fallback branch needs.
    ///
    /// Every field is required. A missing key is an error, never a default.
    pub fn from_event(event: &Value) -> Result<Self> {
        Ok(Self {
            intent_name: required_str(event, "/sessionState/intent/name")?,
            slots: required(event, "/sessionState/intent/slots")?.clone(),
            session_attributes: required(event, "/sessionState/sessionAttributes")?.clone(),
            input_transcript: required_str(event, "/inputTranscript")?,
        })
    }
}

fn required<'a>(event: &'a Value, pointer: &str) -> Result<&'a Value> {
    event
        .pointer(pointer)
        .ok_or_else(|| Error::MissingField(field_path(pointer)))
}

fn required_str(event: &Value, pointer: &str) -> Result<String> {
    required(event, pointer)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| Error::Validation(format!("{} must be a string", field_path(pointer))))
}

/// `/sessionState/intent/name` -> `sessionState.intent.name`
fn field_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

/// Response returned to Lex for a handled turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_state: SessionState,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub dialog_action: DialogAction,
    pub intent: Intent,
    pub session_attributes: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: DialogActionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogActionType {
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    pub name: String,
    pub slots: Value,
    pub state: IntentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntentState {
    Fulfilled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: ContentType,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    PlainText,
}

impl LexResponse {
    /// Close the turn as fulfilled with a single plain-text message.
    ///
    /// The content is not inspected; an empty string is sent as-is.
    pub fn close_fulfilled(request: FallbackRequest, content: impl Into<String>) -> Self {
        Self {
            session_state: SessionState {
                dialog_action: DialogAction {
                    action_type: DialogActionType::Close,
                },
                intent: Intent {
                    name: request.intent_name,
                    slots: request.slots,
                    state: IntentState::Fulfilled,
                },
                session_attributes: request.session_attributes,
            },
            messages: vec![Message {
                content_type: ContentType::PlainText,
                content: content.into(),
            }],
        }
    }
}
