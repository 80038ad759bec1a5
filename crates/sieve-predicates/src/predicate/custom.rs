//! Externally supplied predicates.
//!
//! A custom predicate wraps arbitrary logic. Its identity key comes from the
//! callable's own hash key rather than from the wrapper, so independently
//! registered callables that declare the same key deduplicate as one
//! predicate. Callables without a key fall back to object identity.

use super::{Predicate, PredicateIdentity};
use crate::interface::ResourceRef;
use crate::request::PredicateRequest;
use std::fmt;
use std::sync::Arc;

/// Logic plugged into a [`CustomPredicate`].
///
/// Implemented for every `Fn(Option<&ResourceRef>, &dyn PredicateRequest) -> bool`
/// closure. Implement it on your own type to control the label, the
/// description and the identity key.
pub trait CustomCheck: Send + Sync {
    fn check(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool;

    /// Text used verbatim as the predicate's text, if any.
    fn label(&self) -> Option<String> {
        None
    }

    /// Descriptive representation used when there is no label.
    fn description(&self) -> String {
        format!("object {}", std::any::type_name::<Self>())
    }

    /// Identity key. Equal keys mean logically identical predicates.
    fn hash_key(&self) -> Option<u64> {
        None
    }
}

impl<F> CustomCheck for F
where
    F: Fn(Option<&ResourceRef>, &dyn PredicateRequest) -> bool + Send + Sync,
{
    fn check(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        self(context, request)
    }

    fn description(&self) -> String {
        format!("function {}", std::any::type_name::<F>())
    }
}

/// Delegates evaluation to an external callable.
#[derive(Clone)]
pub struct CustomPredicate {
    check: Arc<dyn CustomCheck>,
    label: Option<String>,
    hash_key: Option<u64>,
}

impl CustomPredicate {
    pub fn new(check: impl CustomCheck + 'static) -> Self {
        Self {
            check: Arc::new(check),
            label: None,
            hash_key: None,
        }
    }

    /// Wrap a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Option<&ResourceRef>, &dyn PredicateRequest) -> bool + Send + Sync + 'static,
    {
        Self::new(f)
    }

    /// Attach a human-readable label, used verbatim as the text.
    pub fn with_text(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach an identity key.
    pub fn with_hash_key(mut self, key: u64) -> Self {
        self.hash_key = Some(key);
        self
    }

    fn identity_key(&self) -> u64 {
        self.hash_key
            .or_else(|| self.check.hash_key())
            .unwrap_or_else(|| Arc::as_ptr(&self.check) as *const () as usize as u64)
    }
}

impl PredicateIdentity for CustomPredicate {
    fn text(&self) -> String {
        self.label
            .clone()
            .or_else(|| self.check.label())
            .unwrap_or_else(|| format!("custom predicate: {}", self.check.description()))
    }

    fn phash(&self) -> String {
        format!("custom:{}", self.identity_key())
    }
}

impl Predicate for CustomPredicate {
    fn evaluate(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        self.check.check(context, request)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("text", &self.text())
            .field("hash_key", &self.identity_key())
            .finish()
    }
}
