//! Checked projections of raw `result` values into the facade's types.
//!
//! [`RpcResult`] carries the method name along with the value so a rejected shape can be
//! reported against the call that produced it. Nothing is coerced.

use serde_json::Value;

use deluge_torrent_types::{DelugeError, TorrentStatus};

/// Wrapper for converting the `result` of `method` into a typed value.
#[derive(Debug)]
pub(crate) struct RpcResult {
    pub(crate) method: &'static str,
    pub(crate) value: Value,
}

impl RpcResult {
    pub(crate) fn new(method: &'static str, value: Value) -> Self {
        Self { method, value }
    }

    fn unexpected(self, expected: &'static str) -> DelugeError {
        DelugeError::UnexpectedResultShape {
            method: self.method.to_owned(),
            expected,
            found: self.value.to_string(),
        }
    }
}

impl TryFrom<RpcResult> for Vec<String> {
    type Error = DelugeError;

    fn try_from(wrapper: RpcResult) -> Result<Self, Self::Error> {
        const EXPECTED: &str = "a list of strings";

        let ids: Option<Vec<String>> = match &wrapper.value {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect(),
            _ => None,
        };

        ids.ok_or_else(|| wrapper.unexpected(EXPECTED))
    }
}

impl TryFrom<RpcResult> for TorrentStatus {
    type Error = DelugeError;

    fn try_from(wrapper: RpcResult) -> Result<Self, Self::Error> {
        match wrapper.value {
            Value::Object(map) => Ok(map),
            _ => Err(wrapper.unexpected("a mapping")),
        }
    }
}

impl TryFrom<RpcResult> for String {
    type Error = DelugeError;

    fn try_from(wrapper: RpcResult) -> Result<Self, Self::Error> {
        match wrapper.value {
            Value::String(s) => Ok(s),
            _ => Err(wrapper.unexpected("a string")),
        }
    }
}

impl TryFrom<RpcResult> for bool {
    type Error = DelugeError;

    fn try_from(wrapper: RpcResult) -> Result<Self, Self::Error> {
        match wrapper.value {
            Value::Bool(b) => Ok(b),
            _ => Err(wrapper.unexpected("a boolean")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testutil::make_test_status;

    fn assert_unexpected<T: std::fmt::Debug>(result: Result<T, DelugeError>, expected_shape: &str) {
        match result {
            Err(DelugeError::UnexpectedResultShape {
                method, expected, ..
            }) => {
                assert_eq!(method, "test.method");
                assert_eq!(expected, expected_shape);
            }
            other => panic!("Expected UnexpectedResultShape, got: {other:?}"),
        }
    }

    #[test]
    fn test_string_list_conversion() {
        let ids: Vec<String> = RpcResult::new("test.method", json!(["abc", "def"]))
            .try_into()
            .unwrap();
        assert_eq!(ids, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_string_list_rejects_non_strings() {
        let result: Result<Vec<String>, _> =
            RpcResult::new("test.method", json!([1, 2, 3])).try_into();
        assert_unexpected(result, "a list of strings");

        let result: Result<Vec<String>, _> =
            RpcResult::new("test.method", json!(["abc", null])).try_into();
        assert_unexpected(result, "a list of strings");

        let result: Result<Vec<String>, _> =
            RpcResult::new("test.method", json!("abc")).try_into();
        assert_unexpected(result, "a list of strings");
    }

    #[test]
    fn test_status_conversion() {
        let status: TorrentStatus =
            RpcResult::new("test.method", Value::Object(make_test_status("My Torrent")))
                .try_into()
                .unwrap();
        assert_eq!(status["name"], json!("My Torrent"));
        assert_eq!(status["progress"], json!(50.0));

        let result: Result<TorrentStatus, _> =
            RpcResult::new("test.method", json!([])).try_into();
        assert_unexpected(result, "a mapping");
    }

    #[test]
    fn test_scalar_conversions() {
        let id: String = RpcResult::new("test.method", json!("abc123"))
            .try_into()
            .unwrap();
        assert_eq!(id, "abc123");
        let removed: bool = RpcResult::new("test.method", json!(true))
            .try_into()
            .unwrap();
        assert!(removed);

        let result: Result<String, _> = RpcResult::new("test.method", Value::Null).try_into();
        assert_unexpected(result, "a string");
        let result: Result<bool, _> = RpcResult::new("test.method", json!("true")).try_into();
        assert_unexpected(result, "a boolean");
    }
}
