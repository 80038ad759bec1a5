//! Errors raised while building predicates.
//!
//! Evaluation never fails: a predicate that cannot find the data it looks at
//! simply does not match. The only failure is at registration time.

/// A predicate could not be built from its configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A regular expression did not compile. The message is the regex
    /// engine's own diagnostic, unmodified.
    #[error("{message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ConfigurationError {
    /// Wrap a regex compile failure for `pattern`.
    pub fn invalid_pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// The offending pattern.
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPattern { pattern, .. } => pattern,
        }
    }
}
