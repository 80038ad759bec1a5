//! View and route predicates.
//!
//! A predicate is a small boolean test attached to a candidate handler. A
//! dispatcher holding several candidates for the same URL pattern selects
//! the first one whose predicates all pass.
//!
//! Every predicate also describes itself:
//!
//! - `text()` - a canonical, value-based description used for introspection
//!   and as a tie-break sort key
//! - `phash()` - the identity key used to deduplicate logically identical
//!   registrations; defaults to `text()`
//!
//! # Module Structure
//!
//! - `pattern` - start-anchored regex predicates (path info, header)
//! - `attributes` - request attribute predicates (xhr, method, accept, request type)
//! - `params` - request and match-dict parameter predicates
//! - `containment` - resource lineage predicate
//! - `custom` - externally supplied callables
//! - `traverse` - the route-info mutator exposed through the same identity contract
//!
//! # Design Decisions
//!
//! - The set of variants is closed; `CustomPredicate` is the escape hatch
//! - Construction validates eagerly; only invalid regexes fail
//! - Evaluation is total: missing data means "no match", never an error
//! - `TraversePredicate` is not a [`Predicate`]: it mutates request-scoped
//!   route info and is applied separately

mod attributes;
mod containment;
mod custom;
mod params;
mod pattern;
mod traverse;

use crate::interface::ResourceRef;
use crate::request::PredicateRequest;
use std::fmt;

pub use attributes::{AcceptPredicate, RequestMethodPredicate, RequestTypePredicate, XhrPredicate};
pub use containment::ContainmentPredicate;
pub use custom::{CustomCheck, CustomPredicate};
pub use params::{MatchParamPredicate, RequestParamPredicate};
pub use pattern::{HeaderPredicate, PathInfoPredicate, StartPattern};
pub use traverse::TraversePredicate;

/// Canonical description and identity of a predicate.
pub trait PredicateIdentity {
    /// Human-readable, value-based description. Equal inputs give equal text
    /// regardless of the order multi-valued input was written in.
    fn text(&self) -> String;

    /// Identity key. Two predicates are logically the same iff their keys
    /// are equal. Computable without a request.
    fn phash(&self) -> String {
        self.text()
    }
}

/// A pure boolean test over a request.
///
/// Implementations are immutable after construction and safe to evaluate
/// concurrently.
pub trait Predicate: PredicateIdentity + fmt::Debug + Send + Sync {
    /// True if the request satisfies this predicate.
    ///
    /// `context` is the resource the request was resolved to, when the
    /// caller has one.
    fn evaluate(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool;
}

/// Format a boolean the way predicate text spells it.
pub(crate) fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
