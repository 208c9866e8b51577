//! JSON-RPC request and response envelopes.

use serde::Serialize;
use serde_json::{Map, Value};

use deluge_torrent_types::DelugeError;

/// Outbound envelope, built fresh for every call.
#[derive(Debug, Serialize)]
pub(crate) struct RequestEnvelope<'a> {
    pub(crate) method: &'a str,
    pub(crate) id: u64,
    pub(crate) params: &'a [Value],
}

impl RequestEnvelope<'_> {
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, DelugeError> {
        serde_json::to_vec(self).map_err(|e| DelugeError::Serialization(e.to_string()))
    }
}

/// Decoded response of a successful round trip.
///
/// `result` is not validated here; its shape depends on the method that was called.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// The call specific payload.
    pub result: Value,
    /// The daemon reported error, `Value::Null` when the call succeeded.
    pub error: Value,
    /// The id echoed by the daemon, if any.
    pub id: Value,
}

impl ResponseEnvelope {
    /// Decode a response body. The body must be a JSON object; absent `result` or `error` keys
    /// are read as `null`.
    pub(crate) fn from_slice(body: &[u8]) -> Result<Self, DelugeError> {
        let mut fields: Map<String, Value> =
            serde_json::from_slice(body).map_err(|e| DelugeError::Protocol(e.to_string()))?;

        Ok(Self {
            result: fields.remove("result").unwrap_or(Value::Null),
            error: fields.remove("error").unwrap_or(Value::Null),
            id: fields.remove("id").unwrap_or(Value::Null),
        })
    }

    /// Whether the daemon reported an error.
    pub fn is_error(&self) -> bool {
        !self.error.is_null()
    }
}
