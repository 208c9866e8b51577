//! Deluge RPC client implementation.

use serde_json::{Value, json};
use tracing::debug;

use deluge_torrent_types::{Deluge, DelugeError, TorrentOptions, TorrentStatus};

use crate::conversions::RpcResult;
use crate::ops::RpcOps;
use crate::session::Session;


const GET_SESSION_STATE: &str = "core.get_session_state";
const GET_TORRENT_STATUS: &str = "core.get_torrent_status";
const GET_TORRENTS_STATUS: &str = "core.get_torrents_status";
const ADD_TORRENT_FILE: &str = "core.add_torrent_file";
const ADD_TORRENT_MAGNET: &str = "core.add_torrent_magnet";
const ADD_TORRENT_URL: &str = "core.add_torrent_url";
const REMOVE_TORRENT: &str = "core.remove_torrent";

/// DelugeClient is a torrent client that uses the Deluge Web UI JSON-RPC API.
#[allow(missing_debug_implementations, private_bounds)]
pub struct DelugeClient<T: RpcOps = Session> {
    ops: T,
}

impl DelugeClient {
    /// Create a new DelugeClient.
    ///
    /// This method is async as the session is authenticated on creation; no client is returned
    /// if the daemon rejects `password`.
    pub async fn try_new(rpc_url: &str, password: &str) -> Result<Self, DelugeError> {
        let session = Session::connect(rpc_url, password).await?;
        Ok(Self::from_session(session))
    }

    /// Wrap an already authenticated session.
    pub fn from_session(session: Session) -> Self {
        Self { ops: session }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.ops
    }
}

#[allow(private_bounds)]
impl<T: RpcOps> DelugeClient<T> {
    /// Create a DelugeClient with a custom transport implementation.
    /// This is primarily useful for testing with mocks.
    #[cfg(test)]
    pub(crate) fn with_ops(ops: T) -> Self {
        Self { ops }
    }

    async fn call<R>(&self, method: &'static str, params: Vec<Value>) -> Result<R, DelugeError>
    where
        R: TryFrom<RpcResult, Error = DelugeError>,
    {
        let value = self.ops.call(method, params).await?;
        RpcResult::new(method, value).try_into()
    }
}

#[allow(private_bounds)]
impl<T: RpcOps> Deluge for DelugeClient<T> {
    async fn torrent_ids(&self) -> Result<Vec<String>, DelugeError> {
        debug!("Listing torrents");
        let ids: Vec<String> = self.call(GET_SESSION_STATE, vec![]).await?;
        debug!("Torrents in session: {ids:?}");

        Ok(ids)
    }

    async fn torrent_status(&self, id: &str) -> Result<TorrentStatus, DelugeError> {
        debug!("Getting status for torrent {id}");
        self.call(GET_TORRENT_STATUS, vec![json!(id), json!([])])
            .await
    }

    async fn torrents_status(&self) -> Result<TorrentStatus, DelugeError> {
        debug!("Getting status for all torrents");
        let status: TorrentStatus = self
            .call(GET_TORRENTS_STATUS, vec![json!({}), json!([])])
            .await?;
        debug!("Got status for {} torrents", status.len());

        Ok(status)
    }

    async fn add_torrent_file(
        &self,
        file_name: &str,
        content: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError> {
        debug!("Adding torrent from file: {file_name}");
        let id: String = self
            .call(
                ADD_TORRENT_FILE,
                vec![json!(file_name), json!(content), Value::Object(options)],
            )
            .await?;

        debug!("Added torrent {id}");
        Ok(id)
    }

    async fn add_torrent_magnet(
        &self,
        uri: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError> {
        debug!("Adding torrent from magnet: {uri}");
        let id: String = self
            .call(ADD_TORRENT_MAGNET, vec![json!(uri), Value::Object(options)])
            .await?;

        debug!("Added torrent {id}");
        Ok(id)
    }

    async fn add_torrent_url(
        &self,
        url: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError> {
        debug!("Adding torrent from url: {url}");
        let id: String = self
            .call(ADD_TORRENT_URL, vec![json!(url), Value::Object(options)])
            .await?;

        debug!("Added torrent {id}");
        Ok(id)
    }

    async fn remove_torrent(&self, id: &str, remove_data: bool) -> Result<bool, DelugeError> {
        debug!("Removing torrent {id}, remove_data={remove_data}");
        let removed: bool = self
            .call(REMOVE_TORRENT, vec![json!(id), json!(remove_data)])
            .await?;
        debug!("Remove returned {removed}");

        Ok(removed)
    }
}
