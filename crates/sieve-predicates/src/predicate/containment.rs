//! Resource lineage predicate.

use super::{Predicate, PredicateIdentity};
use crate::interface::{find_interface, Configurator, Interface, MarkerRef, ResourceRef};
use crate::request::PredicateRequest;

/// Matches when the resource, or one of its ancestors, provides an
/// interface.
///
/// The lineage walk starts at the request's own context when it has one and
/// falls back to the context passed to `evaluate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentPredicate {
    iface: Interface,
}

impl ContainmentPredicate {
    pub fn new(marker: impl Into<MarkerRef>, config: &dyn Configurator) -> Self {
        Self {
            iface: config.maybe_dotted(&marker.into()),
        }
    }

    pub fn interface(&self) -> &Interface {
        &self.iface
    }
}

impl PredicateIdentity for ContainmentPredicate {
    fn text(&self) -> String {
        format!("containment = {}", self.iface)
    }
}

impl Predicate for ContainmentPredicate {
    fn evaluate(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        request
            .context()
            .or(context)
            .and_then(|start| find_interface(start, &self.iface))
            .is_some()
    }
}
