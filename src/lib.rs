// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! reddump is a command-line tool for exporting Reddit data to CSV files.
//! It fetches a subreddit's newest posts, the comments on those posts, and
//! keyword search results, and writes each to a timestamped CSV file.
//!
//! # Examples
//!
//! Run every export with its default options (the 100 newest posts in
//! r/ClaudeAI, comments on the 10 newest posts in r/ClaudeAI, and posts in
//! r/Utah that mention AI or ChatGPT):
//!
//! ```bash
//! reddump
//! ```
//!
//! Export the 25 newest posts in r/rust:
//!
//! ```bash
//! reddump posts -r rust -n 25
//! ```
//!
//! Export every comment on the 5 newest posts in r/rust, including replies
//! hidden behind "load more comments" and "continue this thread" links:
//!
//! ```bash
//! reddump comments -r rust -n 5 --expand
//! ```
//!
//! Search r/Utah and keep only posts that mention skiing:
//!
//! ```bash
//! reddump search --query skiing --pattern '\bski(ing)?\b'
//! ```
//!
//! Files are written to `demo_data/` unless `--output-dir` or
//! `$REDDUMP_OUTPUT_DIR` says otherwise, and are named
//! `<prefix>_<YYYY-MM-DD_HH-MM-SS>.csv`.
//!
//! # Reddit API Setup
//!
//! Only the newest posts can be exported without credentials, through
//! Reddit's heavily rate-limited public API. Everything else needs an
//! access token. To get one:
//!
//! 1. Create a "script" application at <https://www.reddit.com/prefs/apps>.
//! 2. Store its client ID in `$REDDIT_CLIENT_ID` and its secret in
//!    `$REDDIT_CLIENT_SECRET`, either in your shell's environment or in a
//!    `.env` file in the directory you run reddump from:
//!
//!    ```bash
//!    REDDIT_CLIENT_ID=your_client_id
//!    REDDIT_CLIENT_SECRET=your_client_secret
//!    ```
//!
//! # License
//!
//! reddump is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod auth;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod export;
pub mod filter;
pub mod http;
pub mod record;
pub mod reddit;
pub mod scrape;

#[cfg(test)]
mod test_utils;
