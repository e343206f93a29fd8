// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use log::{debug, warn};

/// Environment variable holding the Reddit application's client ID.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";

/// Environment variable holding the Reddit application's client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// Environment variable that overrides the export directory.
pub const OUTPUT_DIR_VAR: &str = "REDDUMP_OUTPUT_DIR";

/// Directory exports are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "demo_data";

/// Loads a `.env` file from the current directory, or one of its parents,
/// into the environment.
///
/// Variables that are already set are left alone, so real environment
/// variables always win over the file. A missing file is not an error.
pub fn load_env() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => debug!("no .env file found"),
        Err(err) => warn!("could not load .env file: {err}"),
    }
}
