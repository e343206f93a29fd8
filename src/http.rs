// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, Response, StatusCode, header};
use thiserror::Error;

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service). A service might not always
/// be remote, such as when the implementation is a deterministic service
/// used for testing.
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    ///
    /// Fails only if a TLS backend or the DNS resolver cannot be
    /// initialized.
    fn client() -> HTTPResult<Client> {
        let client = ClientBuilder::new()
            .user_agent(Self::user_agent())
            .build()?;
        Ok(client)
    }

    /// An appropriate user agent to use when making HTTP requests.
    ///
    /// Reddit's API rules ask for a unique and descriptive user agent, and
    /// throttle generic ones heavily.
    fn user_agent() -> String {
        format!(
            "{}/{} (subreddit export tool)",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

/// Checks that `resp` was successful and carries a JSON body, then
/// returns the body as text.
pub async fn json_body(resp: Response) -> HTTPResult<String> {
    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .ok_or(HTTPError::MissingContentType)?
        .to_str()?;
    if !content_type.starts_with("application/json") {
        Err(HTTPError::UnexpectedContentType(content_type.to_string()))
    } else {
        Ok(resp.text().await?)
    }
}
