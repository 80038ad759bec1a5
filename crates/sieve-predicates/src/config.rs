//! Predicate configuration as written by users.
//!
//! A [`PredicateConfig`] is the serializable form of a candidate's
//! predicates. Compiling it validates every value (regexes are compiled
//! here, never at request time) and produces the predicates in a fixed
//! canonical order.
//!
//! ```yaml
//! request_method: [GET, HEAD]
//! path_info: "^/api/v\\d+/"
//! header: "Content-Type:application/json"
//! match_param: ["action=edit"]
//! traverse: "/{section}/{id}"
//! ```
//!
//! Custom predicates have no serialized form; push them onto the compiled
//! list.

use crate::error::ConfigurationError;
use crate::interface::{Configurator, MarkerRef, ResourceRef};
use crate::predicate::{
    AcceptPredicate, ContainmentPredicate, HeaderPredicate, MatchParamPredicate,
    PathInfoPredicate, Predicate, RequestMethodPredicate, RequestParamPredicate,
    RequestTypePredicate, TraversePredicate, XhrPredicate,
};
use crate::predicate_list::PredicateList;
use crate::request::PredicateRequest;
use crate::route::RouteInfo;
use crate::util::OneOrMany;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serializable predicate configuration for one view or route candidate.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PredicateConfig {
    /// Require (or forbid) an XHR request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xhr: Option<bool>,

    /// One or more allowed HTTP methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<OneOrMany>,

    /// Regex matched at the start of the decoded path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_info: Option<String>,

    /// `name` or `name=value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_param: Option<String>,

    /// `name` or `name:regex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Media type the client must accept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,

    /// Dotted name of an interface some ancestor of the context provides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containment: Option<String>,

    /// Dotted name of an interface the request provides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,

    /// One or more `key=value` match-dict requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_param: Option<OneOrMany>,

    /// Traversal pattern (routes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traverse: Option<String>,
}

impl PredicateConfig {
    /// Build the predicates. The first invalid value aborts compilation.
    pub fn compile(
        &self,
        config: &dyn Configurator,
    ) -> Result<CompiledPredicates, ConfigurationError> {
        let mut predicates = PredicateList::new();

        if let Some(xhr) = self.xhr {
            predicates.push(XhrPredicate::new(xhr));
        }
        if let Some(methods) = &self.request_method {
            predicates.push(RequestMethodPredicate::new(methods.clone()));
        }
        if let Some(pattern) = &self.path_info {
            predicates.push(PathInfoPredicate::new(pattern)?);
        }
        if let Some(param) = &self.request_param {
            predicates.push(RequestParamPredicate::new(param));
        }
        if let Some(header) = &self.header {
            predicates.push(HeaderPredicate::new(header)?);
        }
        if let Some(accept) = &self.accept {
            predicates.push(AcceptPredicate::new(accept.clone()));
        }
        if let Some(name) = &self.containment {
            predicates.push(ContainmentPredicate::new(name.as_str(), config));
        }
        if let Some(name) = &self.request_type {
            let iface = config.maybe_dotted(&MarkerRef::from(name.as_str()));
            predicates.push(RequestTypePredicate::new(iface));
        }
        if let Some(pairs) = &self.match_param {
            predicates.push(MatchParamPredicate::new(pairs.clone()));
        }

        let traverse = self.traverse.as_deref().map(TraversePredicate::new);

        debug!(
            predicates = predicates.len(),
            traverse = traverse.is_some(),
            "Compiled predicate configuration"
        );

        Ok(CompiledPredicates {
            predicates,
            traverse,
        })
    }
}

/// The result of compiling a [`PredicateConfig`].
#[derive(Debug, Default)]
pub struct CompiledPredicates {
    pub predicates: PredicateList,
    pub traverse: Option<TraversePredicate>,
}

impl CompiledPredicates {
    /// Add a predicate after the configured ones.
    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.predicates.push(predicate);
    }

    /// True if every predicate passes.
    pub fn matches(&self, context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        self.predicates.matches(context, request)
    }

    /// Run the traverse pseudo-predicate, if configured. Always true.
    pub fn apply_traverse(&self, info: &mut RouteInfo) -> bool {
        match &self.traverse {
            Some(traverse) => traverse.apply(info),
            None => true,
        }
    }

    /// Deduplication key of the configured predicates.
    pub fn discriminator(&self) -> String {
        self.predicates.discriminator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{Interface, InterfaceRegistry};
    use crate::predicate::PredicateIdentity;
    use crate::request::RequestInfo;
    use crate::route::MatchDict;

    #[test]
    fn test_empty_config() {
        let compiled = PredicateConfig::default()
            .compile(&InterfaceRegistry::new())
            .unwrap();
        assert!(compiled.predicates.is_empty());
        assert!(compiled.traverse.is_none());
    }

    #[test]
    fn test_canonical_order() {
        let config = PredicateConfig {
            match_param: Some(OneOrMany::from("a=1")),
            xhr: Some(true),
            header: Some("X-Foo".to_string()),
            request_method: Some(OneOrMany::from(["POST", "GET"])),
            ..PredicateConfig::default()
        };
        let compiled = config.compile(&InterfaceRegistry::new()).unwrap();

        assert_eq!(
            compiled.predicates.texts(),
            vec![
                "xhr = True",
                "request_method = GET,POST",
                "header X-Foo",
                "match_param a=1",
            ]
        );
    }

    #[test]
    fn test_invalid_regex_aborts() {
        let config = PredicateConfig {
            path_info: Some("(".to_string()),
            ..PredicateConfig::default()
        };
        let err = config.compile(&InterfaceRegistry::new()).unwrap_err();
        assert_eq!(err.pattern(), "(");

        let config = PredicateConfig {
            header: Some("X-Foo:[".to_string()),
            ..PredicateConfig::default()
        };
        assert!(config.compile(&InterfaceRegistry::new()).is_err());
    }

    #[test]
    fn test_dotted_names_resolved_through_configurator() {
        let api = Interface::extending("app.IApiRequest", [Interface::new("app.IRequest")]);
        let registry = InterfaceRegistry::new().with(api.clone());
        let config = PredicateConfig {
            request_type: Some("app.IApiRequest".to_string()),
            ..PredicateConfig::default()
        };
        let compiled = config.compile(&registry).unwrap();

        let request = RequestInfo::new("GET", "/").providing(api);
        assert!(compiled.matches(None, &request));
    }

    #[test]
    fn test_apply_traverse() {
        let config = PredicateConfig {
            traverse: Some("/{a}/{b}".to_string()),
            ..PredicateConfig::default()
        };
        let compiled = config.compile(&InterfaceRegistry::new()).unwrap();
        assert_eq!(
            compiled.traverse.as_ref().map(|t| t.text()),
            Some("traverse matchdict pseudo-predicate".to_string())
        );

        let mut info = RouteInfo::new([("a", "x"), ("b", "y")].into_iter().collect::<MatchDict>());
        assert!(compiled.apply_traverse(&mut info));
        assert_eq!(
            info.matchdict.traverse(),
            Some(&["x".to_string(), "y".to_string()][..])
        );

        let no_traverse = PredicateConfig::default()
            .compile(&InterfaceRegistry::new())
            .unwrap();
        let mut untouched = RouteInfo::default();
        assert!(no_traverse.apply_traverse(&mut untouched));
        assert!(untouched.matchdict.traverse().is_none());
    }

    #[test]
    fn test_deserialize_json() {
        let json = r#"{
            "request_method": ["HEAD", "GET"],
            "path_info": "/api",
            "request_param": "debug",
            "accept": "application/json"
        }"#;
        let config: PredicateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.path_info.as_deref(), Some("/api"));

        let compiled = config.compile(&InterfaceRegistry::new()).unwrap();
        assert_eq!(compiled.predicates.len(), 4);
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
xhr: false
request_method: GET
match_param:
  - "def=1"
  - "abc=2"
traverse: "/{section}"
"#;
        let config: PredicateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.request_method, Some(OneOrMany::from("GET")));

        let compiled = config.compile(&InterfaceRegistry::new()).unwrap();
        assert_eq!(
            compiled.predicates.texts(),
            vec!["xhr = False", "request_method = GET", "match_param abc=2,def=1"]
        );
        assert!(compiled.traverse.is_some());
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let result: Result<PredicateConfig, _> = serde_json::from_str(r#"{"colour": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_unset() {
        let config = PredicateConfig {
            accept: Some("text/html".to_string()),
            ..PredicateConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"accept":"text/html"}"#);
    }
}
