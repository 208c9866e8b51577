//! # Deluge Torrent Types
//!
//! This crate defines the error type, the shared aliases and the [`Deluge`] trait implemented by
//! clients of the Deluge Web UI JSON-RPC API.

use std::path::Path;

use base64::{Engine, prelude::BASE64_STANDARD};
use serde_json::{Map, Value};
use thiserror::Error;

/// Status fields of a torrent, keyed by field name, exactly as reported by the daemon.
///
/// For [`Deluge::torrents_status`] the keys are torrent ids and the values are the per-torrent
/// status objects.
pub type TorrentStatus = Map<String, Value>;

/// Options passed along when adding a torrent (`download_location`, `add_paused`, ...).
pub type TorrentOptions = Map<String, Value>;

/// Error type for Deluge RPC operations.
#[derive(Error, Debug)]
pub enum DelugeError {
    /// The endpoint could not be parsed as a URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The outbound request envelope could not be encoded. Never reaches the network.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// HTTP-layer failures (connection refused, DNS, TLS, timeouts, etc.)
    #[error("transport error: {0}")]
    Transport(String),

    /// The daemon answered with a non-200 status.
    #[error("unexpected http status: {0}")]
    HttpStatus(u16),

    /// A 200 response whose body is not a response envelope.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The response envelope carried a non-null `error` field.
    #[error("remote error from {method} (request {id}): {error}")]
    Remote {
        /// The remote procedure that failed.
        method: String,
        /// The request id the failure belongs to.
        id: u64,
        /// The error payload reported by the daemon.
        error: Value,
    },

    /// The daemon did not accept the password.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The `result` of a call did not have the shape the operation requires.
    #[error("unexpected result from {method}: expected {expected}, found {found}")]
    UnexpectedResultShape {
        /// The remote procedure whose result was rejected.
        method: String,
        /// Description of the expected shape.
        expected: &'static str,
        /// The offending value.
        found: String,
    },

    /// File system errors (file not found, permission denied, etc.)
    #[error("file system error: {0}")]
    FileSystem(String),
}

/// A `.torrent` file prepared for [`Deluge::add_torrent_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTorrent {
    /// The file name shown by the daemon.
    pub file_name: String,
    /// Base64 encoded contents of the file.
    pub content: String,
}

/// Read a `.torrent` file and base64 encode it.
/// This is not client specific, so it is not part of the [`Deluge`] trait.
pub fn encode_torrent_file<P: AsRef<Path>>(path: P) -> Result<EncodedTorrent, DelugeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| DelugeError::FileSystem(format!("{}: {e}", path.display())))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DelugeError::FileSystem(format!("{} has no file name", path.display()))
        })?;

    Ok(EncodedTorrent {
        file_name,
        content: BASE64_STANDARD.encode(bytes),
    })
}

/// Deluge trait defines the typed facade over the daemon's remote procedures.
///
/// Every method is a single round trip: no retries, caching or batching.
#[allow(async_fn_in_trait)]
pub trait Deluge {
    /// List the ids (info hashes) of all torrents in the session.
    async fn torrent_ids(&self) -> Result<Vec<String>, DelugeError>;
    /// Get every status field of one torrent.
    async fn torrent_status(&self, id: &str) -> Result<TorrentStatus, DelugeError>;
    /// Get the status of all torrents, keyed by torrent id.
    async fn torrents_status(&self) -> Result<TorrentStatus, DelugeError>;
    /// Add a torrent from base64 encoded file contents. Returns the id of the new torrent.
    async fn add_torrent_file(
        &self,
        file_name: &str,
        content: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError>;
    /// Add a torrent from a magnet URI. Returns the id of the new torrent.
    async fn add_torrent_magnet(
        &self,
        uri: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError>;
    /// Add a torrent the daemon downloads from `url`. Returns the id of the new torrent.
    async fn add_torrent_url(
        &self,
        url: &str,
        options: TorrentOptions,
    ) -> Result<String, DelugeError>;
    /// Remove a torrent by id. If `remove_data` is true, the downloaded data is deleted too.
    async fn remove_torrent(&self, id: &str, remove_data: bool) -> Result<bool, DelugeError>;

    /// Read a local `.torrent` file and add it with [`Deluge::add_torrent_file`].
    async fn add_torrent_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: TorrentOptions,
    ) -> Result<String, DelugeError> {
        let torrent = encode_torrent_file(path)?;
        self.add_torrent_file(&torrent.file_name, &torrent.content, options)
            .await
    }
}
