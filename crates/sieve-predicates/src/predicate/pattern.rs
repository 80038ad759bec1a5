//! Regex predicates anchored at the start of the tested value.

use super::{Predicate, PredicateIdentity};
use crate::error::ConfigurationError;
use crate::interface::ResourceRef;
use crate::request::PredicateRequest;
use regex::Regex;
use std::sync::Arc;

/// A regex that must match at position 0 of the value but may match only a
/// prefix of it. Anchor the end in the pattern itself to require a full
/// match.
#[derive(Debug, Clone)]
pub struct StartPattern {
    source: String,
    regex: Arc<Regex>,
}

impl StartPattern {
    /// Compile `pattern`. On failure the error carries the engine's own
    /// message for the pattern exactly as given.
    pub fn compile(pattern: &str) -> Result<Self, ConfigurationError> {
        let regex =
            Regex::new(pattern).map_err(|e| ConfigurationError::invalid_pattern(pattern, &e))?;
        Ok(Self {
            source: pattern.to_string(),
            regex: Arc::new(regex),
        })
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if a match starts at position 0. The leftmost match is found
    /// first, so any match at 0 is the one returned.
    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.find(value).is_some_and(|m| m.start() == 0)
    }
}

/// Matches the decoded request path against a regex.
#[derive(Debug, Clone)]
pub struct PathInfoPredicate {
    pattern: StartPattern,
}

impl PathInfoPredicate {
    pub fn new(pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            pattern: StartPattern::compile(pattern)?,
        })
    }
}

impl PredicateIdentity for PathInfoPredicate {
    fn text(&self) -> String {
        format!("path_info = {}", self.pattern.as_str())
    }
}

impl Predicate for PathInfoPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        self.pattern.matches(request.upath_info())
    }
}

/// Requires a header to be present, optionally with a value matching a
/// regex.
///
/// Configured as `name` or `name:pattern` (split at the first `:`).
#[derive(Debug, Clone)]
pub struct HeaderPredicate {
    name: String,
    pattern: Option<StartPattern>,
}

impl HeaderPredicate {
    pub fn new(value: &str) -> Result<Self, ConfigurationError> {
        let (name, pattern) = match value.split_once(':') {
            Some((name, pattern)) => (name, Some(StartPattern::compile(pattern)?)),
            None => (value, None),
        };
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PredicateIdentity for HeaderPredicate {
    fn text(&self) -> String {
        match &self.pattern {
            Some(pattern) => format!("header {} = {}", self.name, pattern.as_str()),
            None => format!("header {}", self.name),
        }
    }
}

impl Predicate for HeaderPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        match (&self.pattern, request.header(&self.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(pattern), Some(value)) => pattern.matches(value),
        }
    }
}
