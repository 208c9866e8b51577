//! Cookie state carried between requests of one session.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A cookie returned by the daemon, reduced to what is sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl SessionCookie {
    /// Create a new cookie.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<reqwest::cookie::Cookie<'_>> for SessionCookie {
    fn from(cookie: reqwest::cookie::Cookie<'_>) -> Self {
        Self::new(cookie.name(), cookie.value())
    }
}

/// Holds the cookie set of the most recent response.
///
/// Each response replaces the whole set, it is never merged. When requests race, the last
/// response to complete wins. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub(crate) struct CookieJar {
    cookies: Mutex<Vec<SessionCookie>>,
}

impl CookieJar {
    /// Replace the stored cookies with `cookies`, even when it is empty.
    pub(crate) fn replace(&self, cookies: Vec<SessionCookie>) {
        *self.lock() = cookies;
    }

    /// The `Cookie` header value for the next request, `None` when nothing is stored.
    pub(crate) fn header_value(&self) -> Option<String> {
        let cookies = self.lock();
        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }

    pub(crate) fn snapshot(&self) -> Vec<SessionCookie> {
        self.lock().clone()
    }

    // Poisoning is ignored, every write replaces the whole set.
    fn lock(&self) -> MutexGuard<'_, Vec<SessionCookie>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
