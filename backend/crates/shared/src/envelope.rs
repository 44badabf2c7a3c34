//! Response Envelope
//!
//! Every JSON body the API sends has the shape
//! `{ "result": bool, "message"?: string, ...payload }`.

use serde::Serialize;
use std::borrow::Cow;

/// Envelope around a flattened payload
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload for envelopes that only carry a message
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoPayload {}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            result: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<NoPayload> {
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Envelope::ok(NoPayload {}).with_message(message)
    }
}
