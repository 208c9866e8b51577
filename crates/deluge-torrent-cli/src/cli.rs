use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use deluge_torrent_cli::{Action, Error, parse_options};

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// The Deluge Web UI JSON-RPC endpoint. Overrides DELUGE_URL.
    #[arg(short, long, global = true)]
    pub(crate) url: Option<String>,

    /// The Web UI password. Overrides DELUGE_PASSWORD.
    #[arg(short, long, global = true)]
    pub(crate) password: Option<String>,

    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// The operation to run against the daemon.
#[derive(Debug, Subcommand)]
pub(crate) enum CliCommand {
    /// List the ids of all torrents.
    List,
    /// Show every status field of one torrent.
    Status {
        /// The torrent id (info hash).
        id: String,
    },
    /// Show the status of all torrents.
    StatusAll,
    /// Add a local .torrent file.
    AddFile {
        /// Path to the .torrent file.
        path: PathBuf,
        #[command(flatten)]
        options: CliTorrentOptions,
    },
    /// Add a magnet link.
    AddMagnet {
        /// The magnet URI.
        uri: String,
        #[command(flatten)]
        options: CliTorrentOptions,
    },
    /// Add a torrent the daemon downloads from a URL.
    AddUrl {
        /// The URL of the .torrent file.
        #[arg(value_name = "URL")]
        source: String,
        #[command(flatten)]
        options: CliTorrentOptions,
    },
    /// Remove a torrent.
    Remove {
        /// The torrent id (info hash).
        id: String,
        /// Also delete the downloaded data.
        #[arg(long, default_value_t = false)]
        remove_data: bool,
    },
}

/// CLI representation of the options passed when adding a torrent.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CliTorrentOptions {
    /// Torrent option, repeatable (e.g. -o add_paused=true -o download_location=/data).
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub(crate) options: Vec<String>,
}

impl TryFrom<CliCommand> for Action {
    type Error = Error;

    fn try_from(command: CliCommand) -> Result<Self, Self::Error> {
        let action = match command {
            CliCommand::List => Action::List,
            CliCommand::Status { id } => Action::Status { id },
            CliCommand::StatusAll => Action::StatusAll,
            CliCommand::AddFile { path, options } => Action::AddFile {
                path,
                options: parse_options(&options.options)?,
            },
            CliCommand::AddMagnet { uri, options } => Action::AddMagnet {
                uri,
                options: parse_options(&options.options)?,
            },
            CliCommand::AddUrl { source, options } => Action::AddUrl {
                url: source,
                options: parse_options(&options.options)?,
            },
            CliCommand::Remove { id, remove_data } => Action::Remove { id, remove_data },
        };

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_add_magnet_with_options() {
        let cli = Cli::parse_from([
            "deluge-ctl",
            "add-magnet",
            "magnet:?xt=urn:btih:abc123",
            "-o",
            "add_paused=true",
            "--url",
            "http://nas:8112/json",
        ]);
        assert_eq!(cli.url.as_deref(), Some("http://nas:8112/json"));

        match Action::try_from(cli.command).unwrap() {
            Action::AddMagnet { uri, options } => {
                assert_eq!(uri, "magnet:?xt=urn:btih:abc123");
                assert_eq!(options["add_paused"], json!(true));
            }
            other => panic!("Expected AddMagnet, got: {other:?}"),
        }
    }

    #[test]
    fn parses_remove() {
        let cli = Cli::parse_from(["deluge-ctl", "remove", "abc123", "--remove-data"]);

        assert_eq!(
            Action::try_from(cli.command).unwrap(),
            Action::Remove {
                id: "abc123".into(),
                remove_data: true,
            }
        );
    }

    #[test]
    fn rejects_malformed_option() {
        let cli = Cli::parse_from([
            "deluge-ctl",
            "add-url",
            "https://example.com/a.torrent",
            "-o",
            "paused",
        ]);

        assert!(matches!(
            Action::try_from(cli.command),
            Err(Error::InvalidOption(_))
        ));
    }
}
