// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method channel — JSON request/response dispatch onto the messaging bridge.
//
// Request:   { "method": "sendSms", "arguments": { ... } }
// Response:  { "ok": <value> }
//        or  { "error": { "code", "message", "suggestion", "retriable", "severity" } }
//
// Methods and their arguments:
//
//   sendSms               { phoneNumber, message }  -> { success, message }
//   markThreadAsRead      { threadId? }             -> integer
//   deleteThread          { threadId? }             -> integer
//   getThreadsReadStatus  { threadIds: [...] }      -> { id: bool, ... }
//
// Only malformed requests produce an error reply; the operations themselves
// always answer with a value.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smsguard_core::error::{Result, SmsError};
use smsguard_core::human_errors::{Severity, humanize_error};
use smsguard_core::types::ThreadId;

use crate::messaging::MessagingBridge;
use crate::traits::MessagingPlatform;

#[derive(Debug, Deserialize)]
struct RawRequest {
    method: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct SendSmsArgs {
    #[serde(rename = "phoneNumber")]
    phone_number: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ThreadArgs {
    #[serde(rename = "threadId", default)]
    thread_id: Option<ThreadId>,
}

#[derive(Debug, Deserialize)]
struct ReadStatusArgs {
    #[serde(rename = "threadIds")]
    thread_ids: Vec<ThreadId>,
}

/// Error payload of a channel reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelError {
    pub code: String,
    pub message: String,
    /// What the user can do about it.
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// A channel reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelResponse {
    Ok(Value),
    Error(ChannelError),
}

impl ChannelResponse {
    fn not_implemented(method: &str) -> Self {
        Self::Error(ChannelError {
            code: "notImplemented".into(),
            message: format!("unknown method: {method}"),
            suggestion: "Update the app to the latest version.".into(),
            retriable: false,
            severity: Severity::Permanent,
        })
    }
}

impl From<SmsError> for ChannelResponse {
    fn from(e: SmsError) -> Self {
        let human = humanize_error(&e);
        Self::Error(ChannelError {
            code: e.code().into(),
            message: e.to_string(),
            suggestion: human.suggestion,
            retriable: human.retriable,
            severity: human.severity,
        })
    }
}

/// Serves channel requests against a [`MessagingBridge`].
pub struct MethodChannel<P> {
    bridge: MessagingBridge<P>,
}

impl<P: MessagingPlatform> MethodChannel<P> {
    pub fn new(bridge: MessagingBridge<P>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &MessagingBridge<P> {
        &self.bridge
    }

    /// Handle one encoded request and return the encoded reply.
    pub fn handle(&self, request: &str) -> String {
        let response = match serde_json::from_str::<RawRequest>(request) {
            Ok(raw) => self.dispatch(&raw.method, raw.arguments),
            Err(e) => SmsError::InvalidRequest(e.to_string()).into(),
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            tracing::error!(error = %e, "channel reply could not be encoded");
            r#"{"error":{"code":"serializationError","message":"reply could not be encoded"}}"#
                .to_owned()
        })
    }

    /// Route `method` with its decoded `arguments`.
    pub fn dispatch(&self, method: &str, arguments: Value) -> ChannelResponse {
        tracing::debug!(method, "channel request");
        let result = match method {
            "sendSms" => self.send_sms(arguments),
            "markThreadAsRead" => decode::<ThreadArgs>(arguments)
                .map(|a| Value::from(self.bridge.mark_thread_as_read(a.thread_id.as_ref()))),
            "deleteThread" => decode::<ThreadArgs>(arguments)
                .map(|a| Value::from(self.bridge.delete_thread(a.thread_id.as_ref()))),
            "getThreadsReadStatus" => self.read_status(arguments),
            other => {
                tracing::warn!(method = other, "unknown channel method");
                return ChannelResponse::not_implemented(other);
            }
        };
        match result {
            Ok(value) => ChannelResponse::Ok(value),
            Err(e) => {
                tracing::warn!(method, error = %e, "rejected channel request");
                e.into()
            }
        }
    }

    fn send_sms(&self, arguments: Value) -> Result<Value> {
        let args: SendSmsArgs = decode(arguments)?;
        let outcome = self.bridge.send(&args.phone_number, &args.message);
        Ok(serde_json::to_value(outcome)?)
    }

    fn read_status(&self, arguments: Value) -> Result<Value> {
        let args: ReadStatusArgs = decode(arguments)?;
        let status: BTreeMap<ThreadId, bool> = self
            .bridge
            .threads_read_status(&args.thread_ids)
            .into_iter()
            .collect();
        Ok(serde_json::to_value(status)?)
    }
}

/// Decode method arguments. A missing `arguments` field decodes as `{}`.
fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| SmsError::InvalidRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryPlatform;
    use serde_json::json;

    fn channel() -> MethodChannel<InMemoryPlatform> {
        MethodChannel::new(MessagingBridge::new(InMemoryPlatform::permissive()))
    }

    fn call(channel: &MethodChannel<InMemoryPlatform>, request: Value) -> Value {
        serde_json::from_str(&channel.handle(&request.to_string())).unwrap()
    }

    #[test]
    fn send_sms_returns_outcome() {
        let channel = channel();
        let reply = call(
            &channel,
            json!({ "method": "sendSms", "arguments": { "phoneNumber": "+15550100", "message": "hi" } }),
        );
        assert_eq!(reply["ok"]["success"], json!(true));
        assert_eq!(channel.bridge().platform().transmissions().len(), 1);
    }

    #[test]
    fn mark_read_returns_count() {
        let channel = channel();
        channel.bridge().platform().receive("8", "+1", "a", false);
        let reply = call(
            &channel,
            json!({ "method": "markThreadAsRead", "arguments": { "threadId": "8" } }),
        );
        assert_eq!(reply, json!({ "ok": 1 }));
    }

    #[test]
    fn missing_thread_id_is_zero_not_error() {
        let channel = channel();
        let reply = call(&channel, json!({ "method": "deleteThread", "arguments": {} }));
        assert_eq!(reply, json!({ "ok": 0 }));
        let reply = call(&channel, json!({ "method": "markThreadAsRead" }));
        assert_eq!(reply, json!({ "ok": 0 }));
    }

    #[test]
    fn read_status_is_an_object() {
        let channel = channel();
        channel.bridge().platform().receive("1", "+1", "a", false);
        channel.bridge().platform().receive("2", "+2", "b", true);
        let reply = call(
            &channel,
            json!({ "method": "getThreadsReadStatus", "arguments": { "threadIds": ["1", "2"] } }),
        );
        assert_eq!(reply, json!({ "ok": { "1": false, "2": true } }));
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let reply = call(&channel(), json!({ "method": "sendMms", "arguments": {} }));
        assert_eq!(reply["error"]["code"], json!("notImplemented"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let channel = channel();
        let reply = call(
            &channel,
            json!({ "method": "sendSms", "arguments": { "phoneNumber": 5 } }),
        );
        assert_eq!(reply["error"]["code"], json!("invalidRequest"));
        assert_eq!(reply["error"]["retriable"], json!(false));
        assert_eq!(reply["error"]["severity"], json!("permanent"));
        assert!(reply["error"]["suggestion"].as_str().unwrap().contains("Update"));
        assert!(channel.bridge().platform().transmissions().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        let reply: Value = serde_json::from_str(&channel().handle("not json")).unwrap();
        assert_eq!(reply["error"]["code"], json!("invalidRequest"));
    }
}
