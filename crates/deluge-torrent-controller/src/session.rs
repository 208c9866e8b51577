//! Authenticated session with a Deluge Web UI JSON-RPC endpoint.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use reqwest::{
    StatusCode,
    header::{CONTENT_TYPE, COOKIE},
};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use deluge_torrent_types::DelugeError;

use crate::cookies::{CookieJar, SessionCookie};
use crate::envelope::{RequestEnvelope, ResponseEnvelope};

/// Remote procedure used to authenticate a session.
pub(crate) const AUTH_LOGIN: &str = "auth.login";

/// Per-session request id sequence. The first id handed out is 1.
#[derive(Debug, Default)]
pub(crate) struct RequestIds(AtomicU64);

impl RequestIds {
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
    }

    pub(crate) fn last(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// One authenticated, cookie-tracked connection to a Deluge daemon.
///
/// A `Session` only exists once `auth.login` succeeded, so every call made through it is
/// authenticated. It can be shared between tasks; concurrent calls are not serialized and the
/// cookies of the last response to complete are the ones sent next.
pub struct Session {
    endpoint: Url,
    password: String,
    http: reqwest::Client,
    cookies: CookieJar,
    ids: RequestIds,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password.
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint.as_str())
            .field("password", &"<set>")
            .field("cookies", &self.cookies.snapshot().len())
            .field("last_request_id", &self.ids.last())
            .finish()
    }
}

impl Session {
    /// Connect to the JSON-RPC endpoint (e.g. `http://localhost:8112/json`) and authenticate
    /// with `password`.
    pub async fn connect(endpoint: &str, password: &str) -> Result<Self, DelugeError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(map_reqwest_error)?;
        Self::connect_with_client(endpoint, password, http).await
    }

    /// Like [`Session::connect`], with a preconfigured HTTP client (timeouts, proxies, TLS).
    ///
    /// The client must not have its own cookie store enabled.
    pub async fn connect_with_client(
        endpoint: &str,
        password: &str,
        http: reqwest::Client,
    ) -> Result<Self, DelugeError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| DelugeError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        debug!("Connecting to Deluge RPC at {}", endpoint);
        let session = Self {
            endpoint,
            password: password.to_owned(),
            http,
            cookies: CookieJar::default(),
            ids: RequestIds::default(),
        };
        session.authenticate().await?;

        debug!("Authenticated with Deluge daemon");
        Ok(session)
    }

    /// The endpoint this session talks to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The cookies that will be sent with the next request.
    pub fn cookies(&self) -> Vec<SessionCookie> {
        self.cookies.snapshot()
    }

    /// The id used by the most recent request.
    pub fn last_request_id(&self) -> u64 {
        self.ids.last()
    }

    /// Call `method` with positional `params` and return the decoded response.
    ///
    /// Fails with [`DelugeError::Remote`] when the response carries a non-null `error`,
    /// whatever its `result` is.
    pub async fn invoke(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<ResponseEnvelope, DelugeError> {
        let id = self.ids.next();
        let body = RequestEnvelope {
            method,
            id,
            params: &params,
        }
        .to_bytes()?;

        debug!(method, id, "Sending request");
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(cookies) = self.cookies.header_value() {
            request = request.header(COOKIE, cookies);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(method, id, %status, "Request rejected");
            return Err(DelugeError::HttpStatus(status.as_u16()));
        }

        self.cookies
            .replace(response.cookies().map(SessionCookie::from).collect());

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let envelope = ResponseEnvelope::from_slice(&body)?;
        if envelope.is_error() {
            warn!(method, id, error = %envelope.error, "Remote error");
            return Err(DelugeError::Remote {
                method: method.to_owned(),
                id,
                error: envelope.error,
            });
        }

        debug!(method, id, "Received response");
        Ok(envelope)
    }

    async fn authenticate(&self) -> Result<(), DelugeError> {
        let response = self
            .invoke(AUTH_LOGIN, vec![Value::String(self.password.clone())])
            .await?;

        if response.result != Value::Bool(true) {
            warn!("Deluge daemon rejected the password");
            return Err(DelugeError::AuthenticationFailed);
        }
        Ok(())
    }
}

/// Maps HTTP client errors to Deluge errors.
fn map_reqwest_error(err: reqwest::Error) -> DelugeError {
    DelugeError::Transport(err.to_string())
}
