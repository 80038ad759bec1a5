//! Interface markers, the resource tree and the configurator.
//!
//! An [`Interface`] is a named marker that resources and requests may
//! provide. Interfaces can extend other interfaces; providing a derived
//! interface also provides its bases.
//!
//! Resources form a tree through [`Resource::parent`]. [`find_interface`]
//! walks that lineage from a starting resource upward.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named interface marker.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Interface {
    name: Arc<str>,
    bases: Arc<[Interface]>,
}

impl Interface {
    /// Create a marker with no bases.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            bases: Arc::from(Vec::new()),
        }
    }

    /// Create a marker that extends `bases`.
    pub fn extending(name: impl AsRef<str>, bases: impl IntoIterator<Item = Interface>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            bases: bases.into_iter().collect::<Vec<_>>().into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[Interface] {
        &self.bases
    }

    /// True if `self` is `other` or (transitively) extends it.
    pub fn is_or_extends(&self, other: &Interface) -> bool {
        self == other || self.bases.iter().any(|b| b.is_or_extends(other))
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Interface {}>", self.name)
    }
}

/// A marker given either as a dotted name or as an already-resolved
/// interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerRef {
    Dotted(String),
    Resolved(Interface),
}

impl From<&str> for MarkerRef {
    fn from(name: &str) -> Self {
        MarkerRef::Dotted(name.to_string())
    }
}

impl From<String> for MarkerRef {
    fn from(name: String) -> Self {
        MarkerRef::Dotted(name)
    }
}

impl From<Interface> for MarkerRef {
    fn from(iface: Interface) -> Self {
        MarkerRef::Resolved(iface)
    }
}

/// Registration-time context used to cross-reference dotted names.
pub trait Configurator {
    /// Resolve a dotted name to the interface it names. Resolved markers
    /// pass through unchanged.
    fn maybe_dotted(&self, value: &MarkerRef) -> Interface;
}

/// A [`Configurator`] backed by a table of known interfaces.
///
/// Names that were never registered resolve to a fresh marker carrying the
/// name itself, so two registrations naming the same unknown interface still
/// agree with each other.
#[derive(Debug, Clone, Default)]
pub struct InterfaceRegistry {
    interfaces: HashMap<String, Interface>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `iface` under its own name.
    pub fn register(&mut self, iface: Interface) -> &mut Self {
        self.interfaces.insert(iface.name().to_string(), iface);
        self
    }

    pub fn with(mut self, iface: Interface) -> Self {
        self.register(iface);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }
}

impl Configurator for InterfaceRegistry {
    fn maybe_dotted(&self, value: &MarkerRef) -> Interface {
        match value {
            MarkerRef::Resolved(iface) => iface.clone(),
            MarkerRef::Dotted(name) => self
                .interfaces
                .get(name)
                .cloned()
                .unwrap_or_else(|| Interface::new(name)),
        }
    }
}

/// A node of the resource tree.
pub trait Resource: fmt::Debug + Send + Sync {
    /// The containing resource, or `None` at the root.
    fn parent(&self) -> Option<ResourceRef>;

    /// True if this resource provides `iface`.
    fn provides(&self, iface: &Interface) -> bool;
}

/// Shared handle to a resource.
pub type ResourceRef = Arc<dyn Resource>;

/// Iterator over a resource and its ancestors, nearest first.
pub struct Lineage {
    next: Option<ResourceRef>,
}

impl Iterator for Lineage {
    type Item = ResourceRef;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// The lineage of `resource`, starting with the resource itself.
pub fn lineage(resource: &ResourceRef) -> Lineage {
    Lineage {
        next: Some(Arc::clone(resource)),
    }
}

/// The nearest resource in the lineage of `resource` (inclusive) that
/// provides `iface`.
pub fn find_interface(resource: &ResourceRef, iface: &Interface) -> Option<ResourceRef> {
    lineage(resource).find(|r| r.provides(iface))
}

/// A plain resource: a name, an optional parent and a set of interfaces.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<ResourceRef>,
    interfaces: Vec<Interface>,
}

impl Node {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
        }
    }

    pub fn child_of(parent: &ResourceRef, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
            interfaces: Vec::new(),
        }
    }

    /// Declare that this node provides `iface`.
    pub fn providing(mut self, iface: Interface) -> Self {
        self.interfaces.push(iface);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_ref(self) -> ResourceRef {
        Arc::new(self)
    }
}

impl Resource for Node {
    fn parent(&self) -> Option<ResourceRef> {
        self.parent.clone()
    }

    fn provides(&self, iface: &Interface) -> bool {
        self.interfaces.iter().any(|i| i.is_or_extends(iface))
    }
}
