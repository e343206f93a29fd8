// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Keyword filtering for posts.

use regex::{Regex, RegexBuilder};

/// Matches "AI", "ChatGPT", and "Chat GPT" as whole words.
pub const AI_KEYWORDS: &str = r"\b(ai|chat\s?gpt)\b";

/// A thing that can be searched.
pub trait Searchable {
    /// The haystacks that can be searched for a needle.
    fn search_fields(&self) -> Vec<&str>;

    /// True if `filter` matches any of the [`Searchable::search_fields()`].
    fn matches(&self, filter: &KeywordFilter) -> bool {
        self.search_fields()
            .into_iter()
            .any(|text| filter.is_match(text))
    }
}

/// A case-insensitive keyword pattern.
#[derive(Clone, Debug)]
pub struct KeywordFilter {
    pattern: Regex,
}

impl KeywordFilter {
    /// Compiles `pattern` into a case-insensitive filter.
    ///
    /// Use `\b` anchors for whole-word matching.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    /// True if the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Keeps only the items that match.
    pub fn apply<T: Searchable>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().filter(|item| item.matches(self)).collect()
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for KeywordFilter {
    /// A filter for [`AI_KEYWORDS`].
    fn default() -> Self {
        Self::new(AI_KEYWORDS).expect("AI_KEYWORDS is a valid regex")
    }
}
