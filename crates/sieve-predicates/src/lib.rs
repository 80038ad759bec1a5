//! View and route predicates for request dispatch.
//!
//! A router that registers several candidate handlers for the same URL
//! pattern uses predicates to decide which candidate applies to a request,
//! and uses each predicate's canonical text and identity key to order and
//! deduplicate registrations.
//!
//! # Example
//!
//! ```
//! use sieve_predicates::{
//!     InterfaceRegistry, PredicateConfig, PredicateRequest, RequestInfo,
//! };
//!
//! let config: PredicateConfig = serde_json::from_str(
//!     r#"{"request_method": ["HEAD", "GET"], "path_info": "/api/"}"#,
//! ).unwrap();
//! let compiled = config.compile(&InterfaceRegistry::new()).unwrap();
//!
//! assert_eq!(
//!     compiled.predicates.texts(),
//!     vec!["request_method = GET,HEAD", "path_info = /api/"],
//! );
//!
//! let request = RequestInfo::new("GET", "/api/users");
//! assert!(compiled.matches(None, &request));
//! assert_eq!(request.method(), "GET");
//! ```

pub mod config;
pub mod error;
pub mod interface;
pub mod predicate;
pub mod predicate_list;
pub mod request;
pub mod route;
pub mod util;

pub use config::{CompiledPredicates, PredicateConfig};
pub use error::ConfigurationError;
pub use interface::{
    find_interface, lineage, Configurator, Interface, InterfaceRegistry, MarkerRef, Node,
    Resource, ResourceRef,
};
pub use predicate::{
    AcceptPredicate, ContainmentPredicate, CustomCheck, CustomPredicate, HeaderPredicate,
    MatchParamPredicate, PathInfoPredicate, Predicate, PredicateIdentity, RequestMethodPredicate,
    RequestParamPredicate, RequestTypePredicate, TraversePredicate, XhrPredicate,
};
pub use predicate_list::PredicateList;
pub use request::{AcceptHeader, PredicateRequest, RequestInfo};
pub use route::{traversal_path, MatchDict, RouteGenerator, RouteInfo};
pub use util::{as_sorted_values, OneOrMany};
