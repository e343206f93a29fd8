// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::auth::Credentials;
use crate::clock::SystemClock;
use crate::conf::{DEFAULT_OUTPUT_DIR, OUTPUT_DIR_VAR};
use crate::export::Exporter;
use crate::filter::{AI_KEYWORDS, KeywordFilter};
use crate::reddit::client::CommentDepth;
use crate::reddit::service::RedditService;
use crate::scrape::{CommentsJob, NewPostsJob, Outcome, Scraper, SearchJob};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::warn;
use std::path::PathBuf;
use std::process;

/// Default keyword search query.
pub const DEFAULT_QUERY: &str = r#"ai OR "chat gpt" OR chatgpt"#;

pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Dumps a subreddit's newest posts, comments, and keyword search results to CSV files", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Directory to write CSV files to
    #[arg(short, long, global = true, env = OUTPUT_DIR_VAR, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity<WarnLevel> {
        self.verbosity
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every export with its default options
    All,

    /// Export a subreddit's newest posts
    Posts(PostsConfig),

    /// Export comments on a subreddit's newest posts
    Comments(CommentsConfig),

    /// Export a subreddit's posts that mention keywords
    Search(SearchConfig),
}

#[derive(Args, Debug)]
struct PostsConfig {
    /// Subreddit to read
    #[arg(short = 'r', long, default_value = "ClaudeAI")]
    subreddit: String,

    /// Number of posts to export
    #[arg(short = 'n', long, default_value_t = 100)]
    limit: u32,

    /// File name prefix [default: <limit>_new_<subreddit>_posts]
    #[arg(long)]
    prefix: Option<String>,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            subreddit: String::from("ClaudeAI"),
            limit: 100,
            prefix: None,
        }
    }
}

impl PostsConfig {
    fn job(&self) -> NewPostsJob {
        let prefix = self.prefix.clone().unwrap_or_else(|| {
            format!("{}_new_{}_posts", self.limit, self.subreddit.to_lowercase())
        });
        NewPostsJob {
            subreddit: self.subreddit.clone(),
            limit: self.limit,
            prefix,
        }
    }
}

#[derive(Args, Debug)]
struct CommentsConfig {
    /// Subreddit to read
    #[arg(short = 'r', long, default_value = "ClaudeAI")]
    subreddit: String,

    /// Number of newest posts to collect comments from
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: u32,

    /// Collect every reply, loading comments hidden behind "more" links
    #[arg(long, default_value_t = false)]
    expand: bool,

    /// File name prefix [default: <subreddit>_comments_latest<limit>]
    #[arg(long)]
    prefix: Option<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            subreddit: String::from("ClaudeAI"),
            limit: 10,
            expand: false,
            prefix: None,
        }
    }
}

impl CommentsConfig {
    fn depth(&self) -> CommentDepth {
        if self.expand {
            CommentDepth::Expanded
        } else {
            CommentDepth::TopLevel
        }
    }

    fn job(&self) -> CommentsJob {
        let prefix = self.prefix.clone().unwrap_or_else(|| {
            format!(
                "{}_comments_latest{}",
                self.subreddit.to_lowercase(),
                self.limit
            )
        });
        CommentsJob {
            subreddit: self.subreddit.clone(),
            posts: self.limit,
            depth: self.depth(),
            prefix,
        }
    }
}

#[derive(Args, Debug)]
struct SearchConfig {
    /// Subreddit to search
    #[arg(short = 'r', long, default_value = "Utah")]
    subreddit: String,

    /// Search query sent to Reddit
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,

    /// Number of search results to fetch before filtering
    #[arg(short = 'n', long, default_value_t = 50)]
    limit: u32,

    /// Case-insensitive regex a post's title or body must match
    #[arg(short, long, default_value = AI_KEYWORDS)]
    pattern: String,

    /// File name prefix [default: <subreddit>_ai_posts]
    #[arg(long)]
    prefix: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            subreddit: String::from("Utah"),
            query: String::from(DEFAULT_QUERY),
            limit: 50,
            pattern: String::from(AI_KEYWORDS),
            prefix: None,
        }
    }
}

impl SearchConfig {
    fn job(&self) -> Result<SearchJob, regex::Error> {
        let filter = KeywordFilter::new(&self.pattern)?;
        let prefix = self
            .prefix
            .clone()
            .unwrap_or_else(|| format!("{}_ai_posts", self.subreddit.to_lowercase()));
        Ok(SearchJob {
            subreddit: self.subreddit.clone(),
            query: self.query.clone(),
            limit: self.limit,
            filter,
            prefix,
        })
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    scraper: Scraper<RedditService, SystemClock>,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    ///
    /// Credentials are read from the environment once, here. Missing
    /// credentials are not an error; exports that need them will report
    /// that they cannot run.
    pub fn new(config: Config) -> Result<Runner, crate::http::HTTPError> {
        let credentials = match Credentials::from_env() {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                warn!("{err}; requests will not be authenticated");
                None
            }
        };
        let service = RedditService::new()?;
        let exporter = Exporter::new(config.output_dir().clone(), SystemClock);
        let scraper = Scraper::new(service, credentials, exporter);
        Ok(Self { config, scraper })
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// Every requested export runs, even if an earlier one fails.
    pub async fn run(&self) {
        match &self.config.command {
            None | Some(Command::All) => self.run_all().await,
            Some(Command::Posts(config)) => self.run_posts(config).await,
            Some(Command::Comments(config)) => self.run_comments(config).await,
            Some(Command::Search(config)) => self.run_search(config).await,
        }
    }

    async fn run_all(&self) {
        self.run_posts(&PostsConfig::default()).await;
        self.run_comments(&CommentsConfig::default()).await;
        self.run_search(&SearchConfig::default()).await;
    }

    async fn run_posts(&self, config: &PostsConfig) {
        println!(
            "Getting {} newest posts from r/{}...",
            config.limit, config.subreddit
        );
        report(self.scraper.new_posts(&config.job()).await);
    }

    async fn run_comments(&self, config: &CommentsConfig) {
        println!(
            "Getting comments for {} newest posts in r/{}...",
            config.limit, config.subreddit
        );
        report(self.scraper.comments(&config.job()).await);
    }

    async fn run_search(&self, config: &SearchConfig) {
        println!(
            "Getting posts in r/{} matching {}...",
            config.subreddit, config.query
        );
        match config.job() {
            Ok(job) => report(self.scraper.search(&job).await),
            Err(err) => eprintln!("Invalid pattern {}: {err}", config.pattern),
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Saved { .. } => println!("{outcome}"),
        _ => eprintln!("{outcome}"),
    }
}
