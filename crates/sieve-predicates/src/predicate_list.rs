//! Ordered predicate lists held per candidate handler.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     PredicateConfig / hand-built predicates
//!     → PredicateList (canonical order)
//!     → discriminator() for deduplication, weight() for ordering
//!
//! Dispatch (per request):
//!     candidates[] → PredicateList::matches(context, request)
//!     → first candidate whose predicates all pass wins
//! ```

use crate::interface::ResourceRef;
use crate::predicate::Predicate;
use crate::request::PredicateRequest;
use std::collections::BTreeSet;
use tracing::trace;

/// The predicates guarding one candidate handler.
#[derive(Debug, Default)]
pub struct PredicateList {
    predicates: Vec<Box<dyn Predicate>>,
}

impl PredicateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.predicates.push(Box::new(predicate));
    }

    pub fn push_boxed(&mut self, predicate: Box<dyn Predicate>) {
        self.predicates.push(predicate);
    }

    pub fn with(mut self, predicate: impl Predicate + 'static) -> Self {
        self.push(predicate);
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Predicate> {
        self.predicates.iter().map(|p| p.as_ref())
    }

    /// True if every predicate passes. Stops at the first failure.
    pub fn matches(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        for predicate in &self.predicates {
            if !predicate.evaluate(context, request) {
                trace!(predicate = %predicate.text(), "Predicate rejected request");
                return false;
            }
        }
        true
    }

    /// Text of each predicate, in list order.
    pub fn texts(&self) -> Vec<String> {
        self.predicates.iter().map(|p| p.text()).collect()
    }

    /// Sorted, deduplicated identity keys. Empty keys are dropped.
    pub fn phashes(&self) -> Vec<String> {
        self.predicates
            .iter()
            .map(|p| p.phash())
            .filter(|h| !h.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// A single key equal for logically identical predicate lists,
    /// whatever order they were built in.
    pub fn discriminator(&self) -> String {
        self.phashes().join("\n")
    }

    /// Number of identity-bearing predicates. A candidate with more
    /// predicates is more specific and should be tried first.
    pub fn weight(&self) -> usize {
        self.phashes().len()
    }
}

impl FromIterator<Box<dyn Predicate>> for PredicateList {
    fn from_iter<T: IntoIterator<Item = Box<dyn Predicate>>>(iter: T) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}
