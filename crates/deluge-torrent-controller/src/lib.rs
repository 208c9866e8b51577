//! # Torrent controller using the Deluge Web UI JSON-RPC API.
//!
//! usage:
//!
//! ```rust,ignore
//! use deluge_torrent_controller::DelugeClient;
//! use deluge_torrent_types::{Deluge, TorrentOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DelugeClient::try_new("http://localhost:8112/json", "deluge").await?;
//!     let id = client
//!         .add_torrent_magnet("magnet:?xt=urn:btih:...", TorrentOptions::new())
//!         .await?;
//!     println!("Added torrent: {id}");
//!     for id in client.torrent_ids().await? {
//!         println!("{id}: {:?}", client.torrent_status(&id).await?.get("state"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every call goes through a [`Session`], which authenticates once on creation, carries the
//! daemon's session cookies between requests and numbers each request with its own id.

#[cfg(test)]
use mockito as _;
#[cfg(test)]
use test_log as _;
#[cfg(test)]
use tracing_subscriber as _;

mod client;
mod conversions;
mod cookies;
mod envelope;
mod ops;
mod session;
#[cfg(test)]
mod testutil;

pub use client::DelugeClient;
pub use cookies::SessionCookie;
pub use envelope::ResponseEnvelope;
pub use session::Session;
