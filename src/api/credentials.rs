//! Credential providers
//!
//! Views never read credentials themselves. An `ApiClient` is built with a
//! provider and asks it for a bearer token on every request, so a token that
//! changes after login is picked up without rebuilding the client.

use std::sync::RwLock;

pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, or none for anonymous calls. The token can be replaced
/// after login.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn set(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Reads the token out of a `Cookie` header value, e.g.
/// `"theme=dark; token=abc123"`.
#[derive(Debug, Clone)]
pub struct CookieCredentials {
    cookie_header: String,
    name: String,
}

impl CookieCredentials {
    pub const DEFAULT_NAME: &'static str = "token";

    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self::with_name(cookie_header, Self::DEFAULT_NAME)
    }

    pub fn with_name(cookie_header: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cookie_header: cookie_header.into(),
            name: name.into(),
        }
    }
}

impl CredentialProvider for CookieCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == self.name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
