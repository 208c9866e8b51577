//! # Deluge Torrent CLI
//!
//! Configuration and command execution behind the `deluge-ctl` binary.
//!
//! ## Example
//!
//! ```rust,ignore
//! use deluge_torrent_cli::{Action, DelugeConfiguration, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    let config = DelugeConfiguration::from_env();
//!    let client = config.connect().await?;
//!    let ids = run(&client, Action::List).await?;
//!    println!("{ids}");
//!    Ok(())
//! }
//! ```

use std::{env, fmt, path::PathBuf};

use clap as _;
use dotenvy as _;
use serde_json::Value;
use thiserror::Error;
use tokio as _;
use tracing::{debug, info};
use tracing_subscriber as _;

use deluge_torrent_controller::DelugeClient;
use deluge_torrent_types::{Deluge, DelugeError, TorrentOptions};

/// Endpoint used when neither `--url` nor `DELUGE_URL` is set.
pub const DEFAULT_URL: &str = "http://localhost:8112/json";
/// The Deluge Web UI's out of the box password.
pub const DEFAULT_PASSWORD: &str = "deluge";

/// Error variants for the command line front end.
#[derive(Error, Debug)]
pub enum Error {
    /// A torrent option was not given as `KEY=VALUE`.
    #[error("invalid option {0:?}: expected KEY=VALUE")]
    InvalidOption(String),

    /// The daemon call failed.
    #[error(transparent)]
    Deluge(#[from] DelugeError),
}

/// Connection settings for the Deluge Web UI.
#[derive(Clone, PartialEq, Eq)]
pub struct DelugeConfiguration {
    /// The JSON-RPC endpoint, e.g. `http://localhost:8112/json`.
    pub url: String,
    /// The Web UI password.
    pub password: String,
}

impl Default for DelugeConfiguration {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl DelugeConfiguration {
    /// Reads `DELUGE_URL` and `DELUGE_PASSWORD` from the environment, falling back to the
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("DELUGE_URL").unwrap_or(defaults.url),
            password: lookup("DELUGE_PASSWORD").unwrap_or(defaults.password),
        }
    }

    /// Replaces the settings that were given explicitly, e.g. on the command line.
    pub fn with_overrides(self, url: Option<String>, password: Option<String>) -> Self {
        Self {
            url: url.unwrap_or(self.url),
            password: password.unwrap_or(self.password),
        }
    }

    /// Connects and authenticates a [`DelugeClient`].
    pub async fn connect(&self) -> Result<DelugeClient, Error> {
        info!("Connecting to {}", self.url);
        let client = DelugeClient::try_new(&self.url, &self.password).await?;
        info!("Connected");
        Ok(client)
    }
}

impl fmt::Debug for DelugeConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print credentials.
        write!(
            f,
            "Deluge(url=\"{}\", password=<{}>)",
            self.url,
            if self.password.is_empty() {
                "unset"
            } else {
                "set"
            },
        )
    }
}

/// One facade operation, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// List torrent ids.
    List,
    /// Status of one torrent.
    Status {
        /// Torrent id.
        id: String,
    },
    /// Status of all torrents.
    StatusAll,
    /// Add a local `.torrent` file.
    AddFile {
        /// Path to the `.torrent` file.
        path: PathBuf,
        /// Options for the new torrent.
        options: TorrentOptions,
    },
    /// Add a magnet link.
    AddMagnet {
        /// The magnet URI.
        uri: String,
        /// Options for the new torrent.
        options: TorrentOptions,
    },
    /// Add a torrent the daemon fetches from a URL.
    AddUrl {
        /// Where the `.torrent` file is served.
        url: String,
        /// Options for the new torrent.
        options: TorrentOptions,
    },
    /// Remove a torrent.
    Remove {
        /// Torrent id.
        id: String,
        /// Also delete the downloaded data.
        remove_data: bool,
    },
}

/// Parses `KEY=VALUE` pairs into torrent options.
///
/// Values are read as JSON when they parse (`true`, `42`, `"x"`, `[..]`), and kept as plain
/// strings otherwise, so `download_location=/data` works without quoting.
pub fn parse_options<S: AsRef<str>>(pairs: &[S]) -> Result<TorrentOptions, Error> {
    pairs
        .iter()
        .map(|pair| {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| Error::InvalidOption(pair.to_string()))?;
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.into()));
            Ok((key.to_string(), value))
        })
        .collect()
}

/// Runs `action` against `client` and returns the result as JSON.
pub async fn run<C: Deluge>(client: &C, action: Action) -> Result<Value, Error> {
    debug!("Running {action:?}");
    let output = match action {
        Action::List => Value::from(client.torrent_ids().await?),
        Action::Status { id } => Value::Object(client.torrent_status(&id).await?),
        Action::StatusAll => Value::Object(client.torrents_status().await?),
        Action::AddFile { path, options } => {
            Value::String(client.add_torrent_path(&path, options).await?)
        }
        Action::AddMagnet { uri, options } => {
            Value::String(client.add_torrent_magnet(&uri, options).await?)
        }
        Action::AddUrl { url, options } => {
            Value::String(client.add_torrent_url(&url, options).await?)
        }
        Action::Remove { id, remove_data } => {
            Value::Bool(client.remove_torrent(&id, remove_data).await?)
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use serde_json::json;

    use deluge_torrent_types::TorrentStatus;

    use super::*;

    /// Records every call and answers with canned values.
    #[derive(Default)]
    struct StubDeluge {
        calls: Mutex<Vec<String>>,
    }

    impl StubDeluge {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Deluge for StubDeluge {
        async fn torrent_ids(&self) -> Result<Vec<String>, DelugeError> {
            self.record("torrent_ids".into());
            Ok(vec!["abc123".into()])
        }

        async fn torrent_status(&self, id: &str) -> Result<TorrentStatus, DelugeError> {
            self.record(format!("torrent_status {id}"));
            let mut status = TorrentStatus::new();
            status.insert("state".into(), json!("Seeding"));
            Ok(status)
        }

        async fn torrents_status(&self) -> Result<TorrentStatus, DelugeError> {
            self.record("torrents_status".into());
            Ok(TorrentStatus::new())
        }

        async fn add_torrent_file(
            &self,
            file_name: &str,
            _content: &str,
            _options: TorrentOptions,
        ) -> Result<String, DelugeError> {
            self.record(format!("add_torrent_file {file_name}"));
            Ok("file-id".into())
        }

        async fn add_torrent_magnet(
            &self,
            uri: &str,
            options: TorrentOptions,
        ) -> Result<String, DelugeError> {
            self.record(format!("add_torrent_magnet {uri} {}", Value::Object(options)));
            Ok("magnet-id".into())
        }

        async fn add_torrent_url(
            &self,
            url: &str,
            _options: TorrentOptions,
        ) -> Result<String, DelugeError> {
            self.record(format!("add_torrent_url {url}"));
            Err(DelugeError::Remote {
                method: "core.add_torrent_url".into(),
                id: 2,
                error: json!("404"),
            })
        }

        async fn remove_torrent(&self, id: &str, remove_data: bool) -> Result<bool, DelugeError> {
            self.record(format!("remove_torrent {id} {remove_data}"));
            Ok(true)
        }
    }

    #[test]
    fn configuration_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([("DELUGE_URL", "http://nas:8112/json")]);
        let config = DelugeConfiguration::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.url, "http://nas:8112/json");
        assert_eq!(config.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn overrides_win() {
        let config = DelugeConfiguration::default()
            .with_overrides(None, Some("secret".into()));

        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn debug_hides_password() {
        let config = DelugeConfiguration::default().with_overrides(None, Some("secret".into()));
        let printed = format!("{config:?}");

        assert!(!printed.contains("secret"));
        assert!(printed.contains("password=<set>"));
    }

    #[test]
    fn options_are_parsed() {
        let options = parse_options(&[
            "add_paused=true",
            "max_connections=50",
            "download_location=/data/torrents",
            "label=\"movies\"",
        ])
        .unwrap();

        assert_eq!(options["add_paused"], json!(true));
        assert_eq!(options["max_connections"], json!(50));
        assert_eq!(options["download_location"], json!("/data/torrents"));
        assert_eq!(options["label"], json!("movies"));
    }

    #[test]
    fn malformed_options_are_rejected() {
        for pair in ["add_paused", "=true"] {
            match parse_options(&[pair]) {
                Err(Error::InvalidOption(msg)) => assert_eq!(msg, pair),
                other => panic!("Expected InvalidOption, got: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn run_dispatches_actions() {
        let client = StubDeluge::default();

        let ids = run(&client, Action::List).await.unwrap();
        assert_eq!(ids, json!(["abc123"]));

        let status = run(&client, Action::Status { id: "abc123".into() })
            .await
            .unwrap();
        assert_eq!(status, json!({"state": "Seeding"}));

        let id = run(
            &client,
            Action::AddMagnet {
                uri: "magnet:?xt=urn:btih:abc123".into(),
                options: parse_options(&["add_paused=true"]).unwrap(),
            },
        )
        .await
        .unwrap();
        assert_eq!(id, json!("magnet-id"));

        let removed = run(
            &client,
            Action::Remove {
                id: "abc123".into(),
                remove_data: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(removed, json!(true));

        assert_eq!(
            client.calls(),
            vec![
                "torrent_ids".to_string(),
                "torrent_status abc123".to_string(),
                "add_torrent_magnet magnet:?xt=urn:btih:abc123 {\"add_paused\":true}".to_string(),
                "remove_torrent abc123 true".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn run_surfaces_daemon_errors() {
        let client = StubDeluge::default();

        let result = run(
            &client,
            Action::AddUrl {
                url: "https://example.com/missing.torrent".into(),
                options: TorrentOptions::new(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::Deluge(DelugeError::Remote { .. }))
        ));
    }

    #[tokio::test]
    async fn run_add_file_reads_the_file() {
        let client = StubDeluge::default();

        let result = run(
            &client,
            Action::AddFile {
                path: "/nonexistent/path/to/fake.torrent".into(),
                options: TorrentOptions::new(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::Deluge(DelugeError::FileSystem(_)))
        ));
        assert!(client.calls().is_empty());
    }
}
