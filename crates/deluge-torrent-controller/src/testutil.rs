//! Shared test utilities and fixtures.

use serde_json::{Value, json};

use deluge_torrent_types::{TorrentOptions, TorrentStatus};

pub(crate) fn make_test_status(name: &str) -> TorrentStatus {
    let status = json!({
        "name": name,
        "state": "Downloading",
        "progress": 50.0,
        "total_size": 1000,
        "total_done": 500,
        "num_peers": 5,
        "num_seeds": 3,
        "download_payload_rate": 1000,
        "upload_payload_rate": 500,
        "save_path": "/downloads",
        "is_finished": false,
        "paused": false,
    });

    match status {
        Value::Object(map) => map,
        _ => unreachable!("fixture is an object"),
    }
}

pub(crate) fn make_test_torrents_status(torrents: &[(&str, &str)]) -> TorrentStatus {
    torrents
        .iter()
        .map(|(id, name)| (id.to_string(), Value::Object(make_test_status(name))))
        .collect()
}

pub(crate) fn make_test_options() -> TorrentOptions {
    let mut options = TorrentOptions::new();
    options.insert("download_location".into(), json!("/downloads"));
    options.insert("add_paused".into(), json!(true));
    options
}
