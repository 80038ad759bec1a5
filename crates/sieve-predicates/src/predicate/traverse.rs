//! The traverse pseudo-predicate.
//!
//! Attached to a route, it turns a traversal pattern such as `/1/:a/:b`
//! into a traversal path and stores it in the route's match-dict. It never
//! rejects a route and contributes nothing to registration identity.

use super::PredicateIdentity;
use crate::route::{traversal_path, RouteGenerator, RouteInfo};
use tracing::trace;

const TRAVERSE_TEXT: &str = "traverse matchdict pseudo-predicate";

/// Injects a `traverse` entry into a route's match-dict.
///
/// This is not a [`Predicate`](super::Predicate): [`apply`](Self::apply)
/// mutates the request-scoped [`RouteInfo`] it is given. Each request must
/// supply its own `RouteInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversePredicate {
    generator: RouteGenerator,
}

impl TraversePredicate {
    /// Compile the traversal pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            generator: RouteGenerator::compile(pattern),
        }
    }

    pub fn pattern(&self) -> &str {
        self.generator.pattern()
    }

    /// Fill `info.matchdict`'s traversal path from the pattern. Always true.
    ///
    /// When `info.traverse` already holds an explicit override the info is
    /// left untouched.
    pub fn apply(&self, info: &mut RouteInfo) -> bool {
        if info.traverse.is_some() {
            return true;
        }
        let quoted = self.generator.generate(&info.matchdict);
        let segments = traversal_path(&quoted);
        trace!(pattern = self.pattern(), path = %quoted, "Injecting traversal path");
        info.matchdict.set_traverse(segments);
        true
    }
}

impl PredicateIdentity for TraversePredicate {
    fn text(&self) -> String {
        TRAVERSE_TEXT.to_string()
    }

    fn phash(&self) -> String {
        String::new()
    }
}
