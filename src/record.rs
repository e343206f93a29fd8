// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Flat rows for exporting posts and comments.

use crate::reddit::thing::{Comment, Post};
use serde::Serialize;

/// A row in an export file.
///
/// Every row of a given type has the same columns, in the order given by
/// [`Record::headers()`], which matches the order of the struct's fields.
pub trait Record: Serialize {
    /// Column names, in order.
    fn headers() -> &'static [&'static str];
}

/// A post, flattened.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostRecord {
    pub title: String,
    pub author: String,
    pub score: i64,
    pub num_comments: i64,
    pub created_utc: f64,
    pub url: String,
    pub permalink: String,
    pub selftext: String,
}

impl Record for PostRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "title",
            "author",
            "score",
            "num_comments",
            "created_utc",
            "url",
            "permalink",
            "selftext",
        ]
    }
}

impl From<Post> for PostRecord {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            author: post.author,
            score: post.score,
            num_comments: post.num_comments,
            created_utc: post.created_utc,
            url: post.url,
            permalink: post.permalink,
            selftext: post.selftext,
        }
    }
}

/// A comment, flattened along with the post it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentRecord {
    pub post_title: String,
    pub post_url: String,
    pub comment_author: String,
    pub comment_body: String,
    pub comment_score: i64,
    pub comment_created_utc: f64,
}

impl CommentRecord {
    /// Flattens `comment`, made on `post`.
    pub fn new(post: &Post, comment: Comment) -> Self {
        Self {
            post_title: post.title.clone(),
            post_url: post.full_url(),
            comment_author: comment.author,
            comment_body: comment.body,
            comment_score: comment.score,
            comment_created_utc: comment.created_utc,
        }
    }
}

impl Record for CommentRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "post_title",
            "post_url",
            "comment_author",
            "comment_body",
            "comment_score",
            "comment_created_utc",
        ]
    }
}
