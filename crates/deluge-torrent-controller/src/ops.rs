//! Internal trait abstracting the JSON-RPC transport.
//!
//! This module provides the [`RpcOps`] trait which abstracts the [`Session`], enabling mocking
//! in tests.

use serde_json::Value;

use deluge_torrent_types::DelugeError;

use crate::session::Session;

/// Internal trait that abstracts a single remote procedure call.
/// This allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub(crate) trait RpcOps {
    /// Call `method` and return the `result` field of the response.
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, DelugeError>;
}

impl RpcOps for Session {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, DelugeError> {
        Ok(self.invoke(method, params).await?.result)
    }
}
