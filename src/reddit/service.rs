// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit. Responses are returned as raw bodies; parsing
//! them is left to [`thing`](crate::reddit::thing).

use crate::auth::{AccessToken, Credentials};
use crate::http::{self, HTTPResult, HTTPService};
use itertools::Itertools;
use log::debug;
use reqwest::{Client, header};

/// Exchanges application credentials for a bearer token.
pub const TOKEN_URI: &str = "https://www.reddit.com/api/v1/access_token";

/// Base of the authenticated API.
pub const OAUTH_BASE: &str = "https://oauth.reddit.com";

/// Base of the public, unauthenticated API.
pub const PUBLIC_BASE: &str = "https://www.reddit.com";

/// Reddit refuses to expand more than this many stubbed comments at once.
pub const MORE_CHILDREN_BATCH: usize = 100;

/// A Reddit API resource and the parameters used to request it.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    /// The newest posts in a subreddit.
    New { subreddit: String, limit: u32 },

    /// The comment page of a single post.
    Comments { post_id: String, limit: u32 },

    /// A post's comment page focused on one comment and its replies, as
    /// linked from "continue this thread".
    Thread {
        post_id: String,
        comment_id: String,
        limit: u32,
    },

    /// A search restricted to one subreddit, newest first.
    Search {
        subreddit: String,
        query: String,
        limit: u32,
    },

    /// Comments hidden behind "load more comments" stubs.
    MoreChildren {
        post_id: String,
        children: Vec<String>,
    },
}

impl Endpoint {
    /// Path of the resource, relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::New { subreddit, .. } => format!("/r/{subreddit}/new"),
            Endpoint::Comments { post_id, .. } | Endpoint::Thread { post_id, .. } => {
                format!("/comments/{post_id}")
            }
            Endpoint::Search { subreddit, .. } => format!("/r/{subreddit}/search"),
            Endpoint::MoreChildren { .. } => String::from("/api/morechildren"),
        }
    }

    /// Full URI of the resource.
    ///
    /// Authenticated requests go to `oauth.reddit.com`; anonymous ones go
    /// to the public site, which needs a `.json` suffix and is rate
    /// limited far more strictly.
    pub fn uri(&self, authenticated: bool) -> String {
        if authenticated {
            format!("{OAUTH_BASE}{}", self.path())
        } else {
            format!("{PUBLIC_BASE}{}.json", self.path())
        }
    }

    /// Query string parameters.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::New { limit, .. } => vec![("limit", limit.to_string())],
            Endpoint::Comments { limit, .. } => vec![("limit", limit.to_string())],
            Endpoint::Thread {
                comment_id, limit, ..
            } => vec![("comment", comment_id.clone()), ("limit", limit.to_string())],
            Endpoint::Search { query, limit, .. } => vec![
                ("q", query.clone()),
                ("limit", limit.to_string()),
                ("restrict_sr", String::from("true")),
                ("sort", String::from("new")),
            ],
            Endpoint::MoreChildren { post_id, children } => vec![
                ("api_type", String::from("json")),
                ("link_id", format!("t3_{post_id}")),
                ("children", children.iter().join(",")),
            ],
        }
    }
}

/// A service for retrieving data from the Reddit API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Performs a GET request for `endpoint` and returns the raw JSON body.
    ///
    /// The request is authenticated with `token` if one is given, and
    /// made against the public API otherwise.
    fn get_resource(
        &self,
        endpoint: &Endpoint,
        token: Option<&AccessToken>,
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Exchanges `credentials` for a token using the client credentials
    /// grant and returns the raw JSON body.
    fn request_token(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Reddit API directly to retrieve information.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
}

impl HTTPService for RedditService {}

impl RedditService {
    /// Creates a new Reddit service.
    pub fn new() -> HTTPResult<Self> {
        let client = Self::client()?;
        Ok(Self { client })
    }
}

impl Service for RedditService {
    async fn get_resource(
        &self,
        endpoint: &Endpoint,
        token: Option<&AccessToken>,
    ) -> HTTPResult<String> {
        let uri = endpoint.uri(token.is_some());
        debug!("GET {uri} {:?}", endpoint.params());

        let mut req = self.client.get(&uri).query(&endpoint.params());
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, token.bearer());
        }
        http::json_body(req.send().await?).await
    }

    async fn request_token(&self, credentials: &Credentials) -> HTTPResult<String> {
        debug!("POST {TOKEN_URI}");
        let resp = self
            .client
            .post(TOKEN_URI)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        http::json_body(resp).await
    }
}
