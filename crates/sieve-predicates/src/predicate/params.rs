//! Request parameter and match-dict parameter predicates.

use super::{Predicate, PredicateIdentity};
use crate::interface::ResourceRef;
use crate::request::PredicateRequest;
use crate::util::OneOrMany;

/// Split `raw` at the first `=` and trim both sides.
fn split_pair(raw: &str) -> Option<(String, String)> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
}

/// Requires a request parameter to exist, or to have an exact value.
///
/// Configured as `name` or `name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParamPredicate {
    name: String,
    value: Option<String>,
}

impl RequestParamPredicate {
    pub fn new(raw: &str) -> Self {
        match split_pair(raw) {
            Some((name, value)) => Self {
                name,
                value: Some(value),
            },
            None => Self {
                name: raw.to_string(),
                value: None,
            },
        }
    }
}

impl PredicateIdentity for RequestParamPredicate {
    fn text(&self) -> String {
        match &self.value {
            Some(value) => format!("request_param {} = {}", self.name, value),
            None => format!("request_param {}", self.name),
        }
    }
}

impl Predicate for RequestParamPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        match &self.value {
            None => request.has_param(&self.name),
            Some(expected) => request.param(&self.name) == Some(expected.as_str()),
        }
    }
}

/// Requires every configured `key=value` pair to be present in the route's
/// match-dict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchParamPredicate {
    reqs: Vec<(String, String)>,
}

impl MatchParamPredicate {
    /// Build from one or more `key=value` strings. The raw strings are
    /// sorted before splitting; an entry without `=` requires an empty value.
    pub fn new(values: impl Into<OneOrMany>) -> Self {
        let reqs = values
            .into()
            .into_sorted()
            .iter()
            .map(|raw| {
                split_pair(raw).unwrap_or_else(|| (raw.trim().to_string(), String::new()))
            })
            .collect();
        Self { reqs }
    }

    pub fn requirements(&self) -> &[(String, String)] {
        &self.reqs
    }
}

impl PredicateIdentity for MatchParamPredicate {
    fn text(&self) -> String {
        let pairs: Vec<String> = self.reqs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("match_param {}", pairs.join(","))
    }
}

impl Predicate for MatchParamPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        let Some(matchdict) = request.matchdict() else {
            return false;
        };
        self.reqs
            .iter()
            .all(|(k, v)| matchdict.get(k) == Some(v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestInfo;
    use crate::route::MatchDict;

    fn with_params(pairs: &[(&str, &str)]) -> RequestInfo {
        pairs
            .iter()
            .fold(RequestInfo::new("GET", "/"), |req, (k, v)| req.with_param(*k, *v))
    }

    fn with_matchdict(pairs: &[(&str, &str)]) -> RequestInfo {
        RequestInfo::new("GET", "/").with_matchdict(pairs.iter().copied().collect::<MatchDict>())
    }

    #[test]
    fn test_request_param_exists() {
        let pred = RequestParamPredicate::new("abc");
        assert!(pred.evaluate(None, &with_params(&[("abc", "1")])));
        assert!(pred.evaluate(None, &with_params(&[("abc", "")])));
        assert!(!pred.evaluate(None, &with_params(&[])));
    }

    #[test]
    fn test_request_param_with_value() {
        let pred = RequestParamPredicate::new("abc=1");
        assert!(pred.evaluate(None, &with_params(&[("abc", "1")])));
        assert!(!pred.evaluate(None, &with_params(&[("abc", "2")])));
        assert!(!pred.evaluate(None, &with_params(&[])));
    }

    #[test]
    fn test_request_param_text() {
        assert_eq!(RequestParamPredicate::new("abc").text(), "request_param abc");
        assert_eq!(RequestParamPredicate::new("abc=  1").text(), "request_param abc = 1");
        assert_eq!(RequestParamPredicate::new("abc=   1").phash(), "request_param abc = 1");
        assert_eq!(RequestParamPredicate::new("abc=1").text(), "request_param abc = 1");
    }

    #[test]
    fn test_request_param_value_with_equals() {
        let pred = RequestParamPredicate::new("token=a=b");
        assert!(pred.evaluate(None, &with_params(&[("token", "a=b")])));
    }

    #[test]
    fn test_match_param_single() {
        let pred = MatchParamPredicate::new("abc=1");
        assert!(pred.evaluate(None, &with_matchdict(&[("abc", "1")])));
        assert!(!pred.evaluate(None, &with_matchdict(&[])));
        assert!(!pred.evaluate(None, &RequestInfo::new("GET", "/")));
    }

    #[test]
    fn test_match_param_multi() {
        let pred = MatchParamPredicate::new(["abc=1", "def=2"]);
        assert!(pred.evaluate(None, &with_matchdict(&[("abc", "1"), ("def", "2")])));
        assert!(!pred.evaluate(None, &with_matchdict(&[("abc", "1"), ("def", "3")])));
    }

    #[test]
    fn test_match_param_text_sorted_and_trimmed() {
        let pred = MatchParamPredicate::new(["def=  1", "abc =2"]);
        assert_eq!(pred.text(), "match_param abc=2,def=1");
        assert_eq!(pred.phash(), "match_param abc=2,def=1");

        let pred = MatchParamPredicate::new(["def=1", "abc=2"]);
        assert_eq!(pred.text(), "match_param abc=2,def=1");
    }
}
