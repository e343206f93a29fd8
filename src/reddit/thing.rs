// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. Every
//! thing arrives wrapped in a `{"kind": ..., "data": ...}` envelope, and
//! collections of things arrive as a "Listing".
//!
//! Reddit's JSON is loose: fields go missing, turn into `null`, or change
//! type (`replies` is an empty string when there are none). Every field
//! here is read through [`lenient`], so a bad field becomes its default
//! (`""`, `0`, or `None`) instead of failing the whole response.

use crate::filter::Searchable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Kind of a comment.
pub const COMMENT_KIND: &str = "t1";

/// Kind of a post (a "link" in Reddit's internals).
pub const POST_KIND: &str = "t3";

/// Kind of a "load more comments" stub.
pub const MORE_KIND: &str = "more";

/// Deserializes a field, substituting `T::default()` if the value is
/// absent, `null`, or of the wrong type.
///
/// Use together with `#[serde(default)]` so that absent keys are covered
/// as well.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A `{"kind": ..., "data": ...}` envelope around a Reddit object.
#[derive(Debug, Default, Deserialize)]
pub struct Thing {
    #[serde(default, deserialize_with = "lenient")]
    kind: String,

    #[serde(default)]
    data: Value,
}

impl Thing {
    /// The kind of the wrapped object, e.g. `"t1"` for comments.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The wrapped object as a post, if it is one.
    pub fn as_post(&self) -> Option<Post> {
        self.decode(POST_KIND)
    }

    /// The wrapped object as a comment, if it is one.
    pub fn as_comment(&self) -> Option<Comment> {
        self.decode(COMMENT_KIND)
    }

    /// The wrapped object as a "more comments" stub, if it is one.
    pub fn as_more(&self) -> Option<More> {
        self.decode(MORE_KIND)
    }

    fn decode<T: DeserializeOwned>(&self, kind: &str) -> Option<T> {
        if self.kind == kind {
            T::deserialize(&self.data).ok()
        } else {
            None
        }
    }
}

/// A page of things.
#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient")]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default, deserialize_with = "lenient")]
    children: Vec<Thing>,
}

impl Listing {
    /// Parses a listing response, such as `/r/<subreddit>/new`.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Things in the listing, in the order Reddit returned them.
    pub fn children(&self) -> &[Thing] {
        &self.data.children
    }

    /// Posts in the listing, in the order Reddit returned them.
    ///
    /// Anything that is not a post is skipped.
    pub fn posts(&self) -> Vec<Post> {
        self.children().iter().filter_map(Thing::as_post).collect()
    }
}

/// A Reddit post.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Post {
    /// Base-36 ID, without the `t3_` prefix.
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient")]
    pub author: String,

    #[serde(default, deserialize_with = "lenient")]
    pub score: i64,

    #[serde(default, deserialize_with = "lenient")]
    pub num_comments: i64,

    /// Seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: f64,

    #[serde(default, deserialize_with = "lenient")]
    pub url: String,

    /// Site-relative path to the post's comment page.
    #[serde(default, deserialize_with = "lenient")]
    pub permalink: String,

    #[serde(default, deserialize_with = "lenient")]
    pub selftext: String,
}

impl Post {
    /// Absolute URL of the post's comment page.
    pub fn full_url(&self) -> String {
        format!("https://www.reddit.com{}", self.permalink)
    }
}

impl Searchable for Post {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.selftext]
    }
}

/// A Reddit comment.
#[derive(Debug, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient")]
    pub author: String,

    #[serde(default, deserialize_with = "lenient")]
    pub body: String,

    #[serde(default, deserialize_with = "lenient")]
    pub score: i64,

    /// Seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: f64,

    /// Reddit sends `""` instead of a listing when there are no replies.
    #[serde(default, deserialize_with = "lenient")]
    replies: Option<Listing>,
}

/// A "load more comments" stub.
#[derive(Debug, Default, Deserialize)]
pub struct More {
    /// IDs of the comments hidden behind the stub.
    ///
    /// Empty for "continue this thread" stubs, which can only be followed
    /// by loading a new comment page.
    #[serde(default, deserialize_with = "lenient")]
    pub children: Vec<String>,

    /// Fullname of the stub's parent: `t3_<id>` for a post, `t1_<id>` for
    /// a comment.
    #[serde(default, deserialize_with = "lenient")]
    pub parent_id: String,
}

/// Comments a walk could not reach.
#[derive(Debug, Default, PartialEq)]
pub struct Stubs {
    /// IDs to load through `/api/morechildren`.
    pub children: Vec<String>,

    /// IDs of comments whose replies continue on another page.
    pub threads: Vec<String>,
}

impl Stubs {
    /// True if nothing is left to load.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.threads.is_empty()
    }

    fn add(&mut self, more: More) {
        if !more.children.is_empty() {
            self.children.extend(more.children);
        } else if let Some(parent) = more.parent_id.strip_prefix("t1_") {
            self.threads.push(String::from(parent));
        }
    }
}

/// The response to `/comments/<id>`: the post, followed by its comments.
#[derive(Debug, Default)]
pub struct CommentTree {
    forest: Vec<Thing>,
}

impl CommentTree {
    /// Parses a comment page.
    ///
    /// The page is a two-element array of listings; the first holds the
    /// post itself and the second its top-level comments. Anything with
    /// fewer than two elements is treated as a post without comments.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        let listings: Vec<Listing> = serde_json::from_str(body)?;
        let forest = listings
            .into_iter()
            .nth(1)
            .map(|listing| listing.data.children)
            .unwrap_or_default();
        Ok(Self { forest })
    }

    /// Top-level comments, as returned. Stubs are dropped.
    pub fn top_level(&self) -> Vec<Comment> {
        self.forest.iter().filter_map(Thing::as_comment).collect()
    }

    /// Every comment in the tree, depth-first with each comment followed
    /// by its replies, along with the "more" stubs left to load.
    pub fn walk(&self) -> (Vec<Comment>, Stubs) {
        let mut comments = vec![];
        let mut stubs = Stubs::default();
        walk_things(&self.forest, &mut comments, &mut stubs);
        (comments, stubs)
    }
}

/// Flattens `things` depth-first into `comments`, collecting "more" stubs
/// into `stubs`.
pub fn walk_things(things: &[Thing], comments: &mut Vec<Comment>, stubs: &mut Stubs) {
    for thing in things {
        if let Some(mut comment) = thing.as_comment() {
            let replies = comment.replies.take();
            comments.push(comment);
            if let Some(replies) = replies {
                walk_things(replies.children(), comments, stubs);
            }
        } else if let Some(more) = thing.as_more() {
            stubs.add(more);
        }
    }
}

/// The response to `/api/morechildren`.
#[derive(Debug, Default, Deserialize)]
pub struct MoreChildren {
    #[serde(default, deserialize_with = "lenient")]
    json: MoreChildrenJson,
}

#[derive(Debug, Default, Deserialize)]
struct MoreChildrenJson {
    #[serde(default, deserialize_with = "lenient")]
    data: MoreChildrenData,
}

#[derive(Debug, Default, Deserialize)]
struct MoreChildrenData {
    #[serde(default, deserialize_with = "lenient")]
    things: Vec<Thing>,
}

impl MoreChildren {
    /// Parses a `morechildren` response.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// The loaded things: comments and possibly further stubs.
    ///
    /// Reddit returns these as a flat list, so replies are not nested.
    pub fn things(&self) -> &[Thing] {
        &self.json.data.things
    }
}
