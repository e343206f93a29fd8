// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Export pipelines.
//!
//! Each pipeline requests its own token, fetches from Reddit, flattens the
//! results into records, and writes them to a new CSV file. Pipelines are
//! independent: one failing does not affect the others.

use crate::auth::{AccessToken, Credentials};
use crate::clock::Clock;
use crate::export::{ExportError, Exporter};
use crate::filter::KeywordFilter;
use crate::record::{CommentRecord, PostRecord, Record};
use crate::reddit::client::{self, CommentDepth, Subreddit, authenticate};
use crate::reddit::service::Service;
use log::{error, info, warn};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The result of running a pipeline.
#[derive(Debug)]
pub enum Outcome {
    /// Records were written to `path`.
    Saved { path: PathBuf, count: usize },

    /// A search found nothing worth keeping, so nothing was written.
    NoMatches,

    /// The pipeline needs an access token and none could be acquired.
    Unauthenticated,

    /// The pipeline failed while fetching or writing.
    Failed(Error),
}

impl Outcome {
    /// True if a file was written.
    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved { path, count } => {
                write!(f, "Saved {count} rows to {}", path.display())
            }
            Outcome::NoMatches => write!(f, "No matching posts found"),
            Outcome::Unauthenticated => write!(f, "Cannot continue without authentication"),
            Outcome::Failed(err) => write!(f, "Error: {err}"),
        }
    }
}

/// A pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    /// Reddit could not be read.
    #[error("{0}")]
    Client(#[from] client::Error),

    /// The export could not be written.
    #[error("{0}")]
    Export(#[from] ExportError),
}

/// Options for exporting a subreddit's newest posts.
#[derive(Clone, Debug)]
pub struct NewPostsJob {
    pub subreddit: String,
    pub limit: u32,
    pub prefix: String,
}

/// Options for exporting comments on a subreddit's newest posts.
#[derive(Clone, Debug)]
pub struct CommentsJob {
    pub subreddit: String,
    /// How many of the newest posts to collect comments from.
    pub posts: u32,
    pub depth: CommentDepth,
    pub prefix: String,
}

/// Options for exporting keyword search results.
#[derive(Clone, Debug)]
pub struct SearchJob {
    pub subreddit: String,
    pub query: String,
    pub limit: u32,
    pub filter: KeywordFilter,
    pub prefix: String,
}

/// Runs export pipelines against a Reddit service.
#[derive(Debug)]
pub struct Scraper<S: Service, C: Clock> {
    service: S,
    credentials: Option<Credentials>,
    exporter: Exporter<C>,
}

impl<S: Service, C: Clock> Scraper<S, C> {
    /// Creates a new scraper.
    ///
    /// `credentials` are exchanged for a fresh token by every pipeline;
    /// without them, only [`Scraper::new_posts()`] can run.
    pub fn new(service: S, credentials: Option<Credentials>, exporter: Exporter<C>) -> Self {
        Self {
            service,
            credentials,
            exporter,
        }
    }

    /// Exports the newest posts in a subreddit.
    ///
    /// Falls back to Reddit's public API if no token can be acquired.
    pub async fn new_posts(&self, job: &NewPostsJob) -> Outcome {
        info!("getting {} newest posts from r/{}", job.limit, job.subreddit);
        let token = self.token().await;
        if token.is_none() {
            info!("falling back to the public API (no authentication)");
        }

        let subreddit = Subreddit::new(&job.subreddit, &self.service, token.as_ref());
        let records = match subreddit.new_posts(job.limit).await {
            Ok(posts) => posts.into_iter().map(PostRecord::from).collect::<Vec<_>>(),
            Err(err) => return self.fail(err.into()),
        };

        self.save(&job.prefix, &records)
    }

    /// Exports comments on the newest posts in a subreddit.
    ///
    /// Requires authentication.
    pub async fn comments(&self, job: &CommentsJob) -> Outcome {
        info!(
            "getting comments for {} newest posts in r/{}",
            job.posts, job.subreddit
        );
        let Some(token) = self.token().await else {
            error!("cannot fetch comments without authentication");
            return Outcome::Unauthenticated;
        };

        let subreddit = Subreddit::new(&job.subreddit, &self.service, Some(&token));
        let posts = match subreddit.new_posts(job.posts).await {
            Ok(posts) => posts,
            Err(err) => return self.fail(err.into()),
        };

        let mut records = vec![];
        for post in &posts {
            match subreddit.comments(post, job.depth).await {
                Ok(comments) => records.extend(
                    comments
                        .into_iter()
                        .map(|comment| CommentRecord::new(post, comment)),
                ),
                Err(err) => return self.fail(err.into()),
            }
        }

        self.save(&job.prefix, &records)
    }

    /// Exports search results whose title or body match the job's
    /// keyword filter.
    ///
    /// Requires authentication. Nothing is written if no posts match.
    pub async fn search(&self, job: &SearchJob) -> Outcome {
        info!("searching r/{} for {}", job.subreddit, job.query);
        let Some(token) = self.token().await else {
            error!("cannot search without authentication");
            return Outcome::Unauthenticated;
        };

        let subreddit = Subreddit::new(&job.subreddit, &self.service, Some(&token));
        let posts = match subreddit.search(&job.query, job.limit).await {
            Ok(posts) => posts,
            Err(err) => return self.fail(err.into()),
        };

        let records: Vec<_> = job
            .filter
            .apply(posts)
            .into_iter()
            .map(PostRecord::from)
            .collect();
        if records.is_empty() {
            warn!("no posts matched {}", job.filter.as_str());
            return Outcome::NoMatches;
        }

        self.save(&job.prefix, &records)
    }

    /// A fresh access token, or `None` without credentials or if the
    /// exchange fails.
    async fn token(&self) -> Option<AccessToken> {
        match &self.credentials {
            Some(credentials) => authenticate(&self.service, credentials).await,
            None => None,
        }
    }

    fn save<R: Record>(&self, prefix: &str, records: &[R]) -> Outcome {
        match self.exporter.export(prefix, records) {
            Ok(path) => Outcome::Saved {
                path,
                count: records.len(),
            },
            Err(err) => self.fail(err.into()),
        }
    }

    fn fail(&self, err: Error) -> Outcome {
        error!("{err}");
        Outcome::Failed(err)
    }
}
