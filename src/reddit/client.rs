// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Reddit API.

use crate::auth::{AccessToken, Credentials};
use crate::http;
use crate::reddit::service::{Endpoint, MORE_CHILDREN_BATCH, Service};
use crate::reddit::thing::{Comment, CommentTree, Listing, MoreChildren, Post, Stubs, walk_things};
use log::{debug, error};
use std::collections::HashSet;
use thiserror::Error;

/// Number of comments requested per comment page.
pub const COMMENT_PAGE_LIMIT: u32 = 100;

/// Requests a bearer token for `credentials`.
///
/// Returns `None`, after logging why, if the exchange fails for any
/// reason. Callers decide whether to carry on anonymously or give up.
pub async fn authenticate<S: Service>(
    service: &S,
    credentials: &Credentials,
) -> Option<AccessToken> {
    let body = match service.request_token(credentials).await {
        Ok(body) => body,
        Err(err) => {
            error!("error getting access token: {err}");
            return None;
        }
    };

    match AccessToken::parse(&body) {
        Ok(token) => {
            debug!("acquired access token");
            Some(token)
        }
        Err(err) => {
            error!("error parsing access token response: {err}");
            None
        }
    }
}

/// How much of each post's comment tree to collect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CommentDepth {
    /// Only top-level comments, as returned on the first comment page.
    #[default]
    TopLevel,

    /// Every comment and reply, loading any comments Reddit left behind
    /// "load more comments" stubs.
    Expanded,
}

/// Reads posts and comments from a single subreddit.
#[derive(Debug)]
pub struct Subreddit<'a, S: Service> {
    name: String,
    service: &'a S,
    token: Option<&'a AccessToken>,
}

impl<'a, S: Service> Subreddit<'a, S> {
    /// Creates a new client for the subreddit `name`.
    ///
    /// Requests are authenticated with `token` when present; otherwise
    /// they go to the public API.
    pub fn new(name: impl Into<String>, service: &'a S, token: Option<&'a AccessToken>) -> Self {
        let name = name.into();
        Self {
            name,
            service,
            token,
        }
    }

    /// The subreddit's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if requests are authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The newest `limit` posts, newest first.
    pub async fn new_posts(&self, limit: u32) -> Result<Vec<Post>, Error> {
        let endpoint = Endpoint::New {
            subreddit: self.name.clone(),
            limit,
        };
        let body = self.get(&endpoint).await?;
        Ok(Listing::parse(&body)?.posts())
    }

    /// Posts matching `query`, newest first.
    ///
    /// Reddit's search is fuzzy, so results may need further filtering.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Post>, Error> {
        let endpoint = Endpoint::Search {
            subreddit: self.name.clone(),
            query: query.to_string(),
            limit,
        };
        let body = self.get(&endpoint).await?;
        Ok(Listing::parse(&body)?.posts())
    }

    /// Comments on `post`, collected to the given `depth`.
    pub async fn comments(&self, post: &Post, depth: CommentDepth) -> Result<Vec<Comment>, Error> {
        let endpoint = Endpoint::Comments {
            post_id: post.id.clone(),
            limit: COMMENT_PAGE_LIMIT,
        };
        let body = self.get(&endpoint).await?;
        let tree = CommentTree::parse(&body)?;

        match depth {
            CommentDepth::TopLevel => Ok(tree.top_level()),
            CommentDepth::Expanded => {
                let (mut comments, stubs) = tree.walk();
                self.expand(post, stubs, &mut comments).await?;
                Ok(comments)
            }
        }
    }

    /// Loads the comments behind "more" stubs and appends them to
    /// `comments`, following any new stubs until none are left.
    ///
    /// Stub IDs are loaded in batches of up to [`MORE_CHILDREN_BATCH`];
    /// no ID and no continued thread is requested twice.
    async fn expand(
        &self,
        post: &Post,
        mut stubs: Stubs,
        comments: &mut Vec<Comment>,
    ) -> Result<(), Error> {
        let mut requested = HashSet::new();
        let mut continued = HashSet::new();

        while !stubs.is_empty() {
            if let Some(parent) = stubs.threads.pop() {
                if continued.insert(parent.clone()) {
                    self.continue_thread(post, &parent, comments, &mut stubs).await?;
                }
                continue;
            }

            let batch: Vec<String> = stubs
                .children
                .drain(..stubs.children.len().min(MORE_CHILDREN_BATCH))
                .filter(|id| requested.insert(id.clone()))
                .collect();
            if batch.is_empty() {
                continue;
            }

            debug!("loading {} more comments for {}", batch.len(), post.id);
            let endpoint = Endpoint::MoreChildren {
                post_id: post.id.clone(),
                children: batch,
            };
            let body = self.get(&endpoint).await?;
            let more = MoreChildren::parse(&body)?;
            walk_things(more.things(), comments, &mut stubs);
        }

        Ok(())
    }

    /// Loads the replies to `parent` that Reddit moved to their own page.
    async fn continue_thread(
        &self,
        post: &Post,
        parent: &str,
        comments: &mut Vec<Comment>,
        stubs: &mut Stubs,
    ) -> Result<(), Error> {
        debug!("continuing thread under {parent} in {}", post.id);
        let endpoint = Endpoint::Thread {
            post_id: post.id.clone(),
            comment_id: String::from(parent),
            limit: COMMENT_PAGE_LIMIT,
        };
        let body = self.get(&endpoint).await?;
        let (thread, more) = CommentTree::parse(&body)?.walk();

        // The page starts with `parent` itself, which is already collected.
        comments.extend(thread.into_iter().filter(|comment| comment.id != parent));
        stubs.children.extend(more.children);
        stubs.threads.extend(more.threads);
        Ok(())
    }

    async fn get(&self, endpoint: &Endpoint) -> Result<String, Error> {
        Ok(self.service.get_resource(endpoint, self.token).await?)
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    mod authenticate {
        use crate::auth::Credentials;
        use crate::reddit::client::authenticate;
        use crate::test_utils::TestService;

        #[tokio::test]
        async fn it_returns_a_token() {
            let service = TestService::new("claude");
            let credentials = Credentials::new("id", "secret");
            let token = authenticate(&service, &credentials).await;
            assert_eq!(token.unwrap().value(), "test-token");
        }

        #[tokio::test]
        async fn it_returns_nothing_if_the_exchange_fails() {
            let service = TestService::new("claude").rejecting_credentials();
            let credentials = Credentials::new("id", "wrong");
            let token = authenticate(&service, &credentials).await;
            assert!(token.is_none());
            assert_eq!(service.token_requests(), 1);
        }

        #[tokio::test]
        async fn it_returns_nothing_if_the_response_has_no_token() {
            let service = TestService::new("claude").with_token_body(r#"{"error": 401}"#);
            let credentials = Credentials::new("id", "secret");
            let token = authenticate(&service, &credentials).await;
            assert!(token.is_none());
        }
    }

    mod subreddit {
        use crate::auth::AccessToken;
        use crate::reddit::client::{CommentDepth, Error, Subreddit};
        use crate::reddit::thing::Post;
        use crate::test_utils::TestService;
        use pretty_assertions::assert_eq;

        fn post(id: &str) -> Post {
            Post {
                id: String::from(id),
                ..Post::default()
            }
        }

        #[tokio::test]
        async fn it_returns_new_posts() {
            let service = TestService::new("claude");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let posts = client.new_posts(100).await.unwrap();
            assert_eq!(posts.len(), 3);
            assert_eq!(
                service.requests(),
                vec!["https://oauth.reddit.com/r/ClaudeAI/new"]
            );
        }

        #[tokio::test]
        async fn it_falls_back_to_the_public_api_without_a_token() {
            let service = TestService::new("claude");
            let client = Subreddit::new("ClaudeAI", &service, None);
            assert!(!client.is_authenticated());
            let posts = client.new_posts(100).await.unwrap();
            assert_eq!(posts.len(), 3);
            assert_eq!(
                service.requests(),
                vec!["https://www.reddit.com/r/ClaudeAI/new.json"]
            );
        }

        #[tokio::test]
        async fn it_returns_search_results() {
            let service = TestService::new("utah");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("Utah", &service, Some(&token));
            let posts = client.search("ai", 50).await.unwrap();
            assert_eq!(posts.len(), 4);
        }

        #[tokio::test]
        async fn it_returns_top_level_comments() {
            let service = TestService::new("claude");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("abc123"), CommentDepth::TopLevel)
                .await
                .unwrap();
            let ids: Vec<_> = comments.into_iter().map(|c| c.id).collect();
            assert_eq!(ids, vec!["c1", "c3"]);
            assert_eq!(service.requests().len(), 1);
        }

        #[tokio::test]
        async fn it_returns_expanded_comments() {
            let service = TestService::new("claude");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("abc123"), CommentDepth::Expanded)
                .await
                .unwrap();
            let ids: Vec<_> = comments.into_iter().map(|c| c.id).collect();
            assert_eq!(ids, vec!["c1", "c2", "c3", "c4", "c5", "c6"]);
            assert_eq!(
                service.requests(),
                vec![
                    "https://oauth.reddit.com/comments/abc123",
                    "https://oauth.reddit.com/api/morechildren",
                    "https://oauth.reddit.com/comments/abc123",
                ]
            );
        }

        #[tokio::test]
        async fn it_loads_continued_threads_from_the_parent_comment() {
            let page = r#"[{}, {"data": {"children": [
                {"kind": "t1", "data": {"id": "a", "replies": {"data": {"children": [
                    {"kind": "more", "data": {"count": 0, "id": "_", "parent_id": "t1_a", "children": []}}
                ]}}}}
            ]}}]"#;
            let thread = r#"[{}, {"data": {"children": [
                {"kind": "t1", "data": {"id": "a", "replies": {"data": {"children": [
                    {"kind": "t1", "data": {"id": "a1", "replies": ""}},
                    {"kind": "t1", "data": {"id": "a2", "replies": ""}}
                ]}}}}
            ]}}]"#;
            let service = TestService::new("claude")
                .with_fixture("comments_deep", page)
                .with_fixture("thread_a", thread);
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("deep"), CommentDepth::Expanded)
                .await
                .unwrap();

            let ids: Vec<_> = comments.into_iter().map(|c| c.id).collect();
            assert_eq!(ids, vec!["a", "a1", "a2"]);
            let requests = service.recorded();
            assert_eq!(requests.len(), 2);
            assert_eq!(requests[1].uri, "https://oauth.reddit.com/comments/deep");
            assert_eq!(requests[1].param("comment"), Some("a"));
            assert!(service.more_children_batches().is_empty());
        }

        #[tokio::test]
        async fn it_loads_stubs_in_batches_of_at_most_one_hundred() {
            let ids: Vec<String> = (0..250).map(|n| format!("x{n}")).collect();
            let stub = |children: &[String]| {
                serde_json::json!({
                    "kind": "more",
                    "data": {"parent_id": "t3_big", "children": children},
                })
            };
            let page = serde_json::json!([{}, {"data": {"children": [
                stub(&ids),
                stub(&ids[..1]),
            ]}}])
            .to_string();
            let service = TestService::new("claude")
                .with_fixture("comments_big", &page)
                .echoing_more_children();
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("big"), CommentDepth::Expanded)
                .await
                .unwrap();

            assert_eq!(comments.len(), 250);
            let sizes: Vec<_> = service
                .more_children_batches()
                .iter()
                .map(Vec::len)
                .collect();
            assert_eq!(sizes, vec![100, 100, 50]);
        }

        #[tokio::test]
        async fn it_never_requests_a_stub_twice() {
            let page = r#"[{}, {"data": {"children": [
                {"kind": "more", "data": {"parent_id": "t3_again", "children": ["m1", "m2"]}}
            ]}}]"#;
            let more = r#"{"json": {"data": {"things": [
                {"kind": "t1", "data": {"id": "m1"}},
                {"kind": "t1", "data": {"id": "m2"}},
                {"kind": "more", "data": {"parent_id": "t1_m2", "children": ["m1", "m2"]}}
            ]}}}"#;
            let service = TestService::new("again")
                .with_fixture("comments_again", page)
                .with_fixture("morechildren_again", more);
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("again"), CommentDepth::Expanded)
                .await
                .unwrap();

            let ids: Vec<_> = comments.into_iter().map(|c| c.id).collect();
            assert_eq!(ids, vec!["m1", "m2"]);
            assert_eq!(service.more_children_batches(), vec![vec!["m1", "m2"]]);
        }

        #[tokio::test]
        async fn it_returns_no_comments_for_a_page_without_a_comment_listing() {
            let service = TestService::new("claude");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let comments = client
                .comments(&post("def456"), CommentDepth::Expanded)
                .await
                .unwrap();
            assert!(comments.is_empty());
        }

        #[tokio::test]
        async fn it_returns_a_service_error_for_missing_resources() {
            let service = TestService::new("claude");
            let token = AccessToken::new("test-token");
            let client = Subreddit::new("ClaudeAI", &service, Some(&token));
            let result = client.comments(&post("nope"), CommentDepth::TopLevel).await;
            assert!(matches!(result, Err(Error::Service(_))));
        }

        #[tokio::test]
        async fn it_returns_a_parse_error_for_invalid_json() {
            let service = TestService::new("garbage");
            let client = Subreddit::new("ClaudeAI", &service, None);
            let result = client.new_posts(100).await;
            assert!(matches!(result, Err(Error::Parse(_))));
        }
    }
}
