use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::entities::{decode_entities, EntityTable};
use super::navigation::{is_likely_navigation_text, NavKeywords};

pub const DEFAULT_MAX_CANDIDATES: usize = 5;
pub const DEFAULT_MIN_LEN: usize = 6;
pub const DEFAULT_REQUIRED_CHAR: char = ',';

/// Deduplicated, order-preserving list of cleaned entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryList(Vec<String>);

impl EntryList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

type Rule = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Cleaning and filtering settings for link texts.
///
/// Steps run in a fixed order: drop blank, trim + decode + trim, required char,
/// minimum length, navigation keywords, extra rules, dedup, truncate.
#[derive(Clone)]
pub struct CandidateFilter {
    pub max_count: usize,
    pub min_len: usize,
    pub required_char: Option<char>,
    pub nav_keywords: NavKeywords,
    pub entities: EntityTable,
    rules: Vec<Rule>,
}

impl CandidateFilter {
    pub fn new(max_count: usize, nav_keywords: NavKeywords) -> Self {
        CandidateFilter {
            max_count,
            min_len: DEFAULT_MIN_LEN,
            required_char: Some(DEFAULT_REQUIRED_CHAR),
            nav_keywords,
            entities: EntityTable::default(),
            rules: Vec::new(),
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn with_required_char(mut self, required: Option<char>) -> Self {
        self.required_char = required;
        self
    }

    pub fn with_entities(mut self, entities: EntityTable) -> Self {
        self.entities = entities;
        self
    }

    /// Add a keep-predicate. Runs after the navigation check.
    pub fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    fn accepts(&self, s: &str) -> bool {
        if let Some(c) = self.required_char {
            if !s.contains(c) {
                return false;
            }
        }
        if s.chars().count() < self.min_len {
            return false;
        }
        if is_likely_navigation_text(s, &self.nav_keywords) {
            return false;
        }
        self.rules.iter().all(|rule| rule(s))
    }

    pub fn apply<S: AsRef<str>>(&self, raw_texts: &[S]) -> EntryList {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for raw in raw_texts {
            if out.len() >= self.max_count {
                break;
            }
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            // decoded &nbsp; can leave new padding, or nothing at all
            let decoded = decode_entities(raw.trim(), &self.entities);
            let cleaned = decoded.trim();
            if cleaned.is_empty() || !self.accepts(cleaned) {
                continue;
            }
            if seen.insert(cleaned.to_string()) {
                out.push(cleaned.to_string());
            }
        }

        debug!(
            "Kept {} of {} link texts (max {})",
            out.len(),
            raw_texts.len(),
            self.max_count
        );
        EntryList(out)
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        CandidateFilter::new(DEFAULT_MAX_CANDIDATES, NavKeywords::default())
    }
}

impl fmt::Debug for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFilter")
            .field("max_count", &self.max_count)
            .field("min_len", &self.min_len)
            .field("required_char", &self.required_char)
            .field("nav_keywords", &self.nav_keywords)
            .field("entities", &self.entities.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Default cleaning with the given cap and keyword set.
pub fn filter_candidates<S: AsRef<str>>(
    raw_texts: &[S],
    max_count: usize,
    nav_keywords: &NavKeywords,
) -> EntryList {
    CandidateFilter::new(max_count, nav_keywords.clone()).apply(raw_texts)
}
