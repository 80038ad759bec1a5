//! Route match output and the helpers the traverse pseudo-predicate needs.
//!
//! # Responsibilities
//! - Hold the match-dict produced by route resolution ([`MatchDict`])
//! - Hold the request-scoped route info being assembled ([`RouteInfo`])
//! - Generate a URL-quoted path from a route pattern and a match-dict
//!   ([`RouteGenerator`])
//! - Split a URL-quoted path into decoded traversal segments
//!   ([`traversal_path`])
//!
//! # Pattern syntax
//! - `{name}` and `{name:regex}` placeholders
//! - `:name` placeholders, only when the pattern contains no braces
//! - a trailing `*name` that captures the remainder of the path
//! - a leading `/` is added when missing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

/// Placeholder names mapped to decoded segment values.
///
/// The `traverse` entry is filled by the traverse pseudo-predicate and is
/// kept apart from the string-valued parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchDict {
    #[serde(flatten)]
    params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    traverse: Option<Vec<String>>,
}

impl MatchDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of entries, counting the traversal path as one.
    pub fn len(&self) -> usize {
        self.params.len() + usize::from(self.traverse.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.traverse.is_none()
    }

    /// The traversal path injected by the traverse pseudo-predicate.
    pub fn traverse(&self) -> Option<&[String]> {
        self.traverse.as_deref()
    }

    pub fn set_traverse(&mut self, segments: Vec<String>) {
        self.traverse = Some(segments);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MatchDict {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            traverse: None,
        }
    }
}

/// Request-scoped route matching info being assembled by route resolution.
///
/// Build a fresh value per request; it is mutated by
/// [`TraversePredicate::apply`](crate::predicate::TraversePredicate::apply).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteInfo {
    /// Name of the matched route, if any.
    pub route: Option<String>,
    /// The match-dict produced by route resolution.
    pub matchdict: MatchDict,
    /// An explicit traversal override. When set, the traverse
    /// pseudo-predicate leaves the match-dict alone.
    pub traverse: Option<String>,
}

impl RouteInfo {
    pub fn new(matchdict: MatchDict) -> Self {
        Self {
            route: None,
            matchdict,
            traverse: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
    Remainder(String),
}

fn brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{[_a-zA-Z][^{}]*(?:\{[^{}]*\}[^{}]*)*\}").expect("static pattern is valid")
    })
}

fn old_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([_a-zA-Z]\w*)").expect("static pattern is valid"))
}

fn star_at_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*(\w*)$").expect("static pattern is valid"))
}

/// Generates a URL-quoted path from a route pattern and a match-dict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGenerator {
    pattern: String,
    parts: Vec<Part>,
}

impl RouteGenerator {
    /// Compile `pattern` into a generator.
    pub fn compile(pattern: &str) -> Self {
        let mut body = if pattern.starts_with('/') {
            pattern.to_string()
        } else {
            format!("/{pattern}")
        };

        let mut remainder = None;
        if let Some(caps) = star_at_end_re().captures(&body) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let start = caps.get(0).map_or(body.len(), |m| m.start());
            body.truncate(start);
            remainder = Some(name);
        }

        if !body.contains('{') {
            body = old_style_re().replace_all(&body, "{$1}").into_owned();
        }

        let mut parts = Vec::new();
        let mut last = 0;
        for m in brace_re().find_iter(&body) {
            if m.start() > last {
                parts.push(Part::Literal(body[last..m.start()].to_string()));
            }
            let inner = &m.as_str()[1..m.as_str().len() - 1];
            let name = inner.split_once(':').map_or(inner, |(name, _)| name);
            parts.push(Part::Placeholder(name.to_string()));
            last = m.end();
        }
        if last < body.len() {
            parts.push(Part::Literal(body[last..].to_string()));
        }
        if let Some(name) = remainder {
            parts.push(Part::Remainder(name));
        }

        Self {
            pattern: pattern.to_string(),
            parts,
        }
    }

    /// The pattern as it was given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Fill the placeholders from `matchdict` and return the URL-quoted path.
    ///
    /// A key missing from the match-dict produces an empty segment.
    pub fn generate(&self, matchdict: &MatchDict) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(&quote_path(text)),
                Part::Placeholder(name) => {
                    let value = lookup(matchdict, name, &self.pattern);
                    out.push_str(&quote_path_segment(value));
                }
                Part::Remainder(name) => {
                    let value = lookup(matchdict, name, &self.pattern);
                    out.push_str(&quote_path(value));
                }
            }
        }
        out
    }
}

fn lookup<'a>(matchdict: &'a MatchDict, name: &str, pattern: &str) -> &'a str {
    match matchdict.get(name) {
        Some(value) => value,
        None => {
            warn!(
                pattern = pattern,
                key = name,
                "Match-dict lacks a key required by route pattern; generating empty segment"
            );
            ""
        }
    }
}

/// Percent-encode a single path segment. `/` is encoded.
pub fn quote_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Percent-encode each `/`-separated piece of `path`, keeping the slashes.
fn quote_path(path: &str) -> String {
    path.split('/')
        .map(quote_path_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a URL-quoted path into decoded traversal segments.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// Segments that do not decode to UTF-8 are decoded lossily.
pub fn traversal_path(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for raw in path.trim_matches('/').split('/') {
        let bytes = urlencoding::decode_binary(raw.as_bytes());
        let segment = String::from_utf8_lossy(&bytes).into_owned();
        match segment.as_str() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments
}
