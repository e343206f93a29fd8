// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Credentials and access tokens for the Reddit API.

use crate::conf::{CLIENT_ID_VAR, CLIENT_SECRET_VAR};
use serde::Deserialize;
use std::env;
use std::fmt;
use thiserror::Error;

/// A Reddit "script" application's client ID and secret.
///
/// Create an application at <https://www.reddit.com/prefs/apps> to get
/// these values.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates a new set of credentials from a client ID and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        Self {
            client_id,
            client_secret,
        }
    }

    /// Retrieves credentials from `$REDDIT_CLIENT_ID` and
    /// `$REDDIT_CLIENT_SECRET`.
    ///
    /// Returns an error if either variable is unset, empty, or not valid
    /// Unicode.
    pub fn from_env() -> AuthResult {
        let client_id = Self::var(CLIENT_ID_VAR)?;
        let client_secret = Self::var(CLIENT_SECRET_VAR)?;
        Ok(Self::new(client_id, client_secret))
    }

    fn var(name: &'static str) -> Result<String, AuthError> {
        match env::var(name) {
            Ok(value) if value.trim().is_empty() => Err(AuthError::Missing(name)),
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(AuthError::Missing(name)),
            Err(err) => Err(AuthError::EnvError(name, err)),
        }
    }

    /// The application's client ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use reddump::auth::Credentials;
    /// let credentials = Credentials::new("my-client-id", "my-secret");
    /// assert_eq!(credentials.client_id(), "my-client-id");
    /// ```
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The application's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Standard result type for [`Credentials`] creation.
pub type AuthResult = Result<Credentials, AuthError>;

/// Indicates an error when loading credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required variable is unset or empty.
    #[error("${0} is not set")]
    Missing(&'static str),

    /// A variable could not be read from the environment.
    #[error("Environment error reading ${0}: {1}")]
    EnvError(&'static str, env::VarError),
}

/// A bearer token issued by Reddit's OAuth endpoint.
///
/// Tokens are never refreshed or persisted; a new one is requested for
/// every export.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    value: String,
}

impl AccessToken {
    /// Wraps a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { value }
    }

    /// Parses the body of a successful token exchange.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// The raw token.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
