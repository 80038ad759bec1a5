//! Predicates over plain request attributes.

use super::{bool_text, Predicate, PredicateIdentity};
use crate::interface::{Interface, ResourceRef};
use crate::request::PredicateRequest;
use crate::util::OneOrMany;

/// Matches on whether the request is an XHR request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XhrPredicate {
    val: bool,
}

impl XhrPredicate {
    pub fn new(val: bool) -> Self {
        Self { val }
    }
}

impl PredicateIdentity for XhrPredicate {
    fn text(&self) -> String {
        format!("xhr = {}", bool_text(self.val))
    }
}

impl Predicate for XhrPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        request.is_xhr() == self.val
    }
}

/// Matches when the request method is one of the configured methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMethodPredicate {
    methods: Vec<String>,
}

impl RequestMethodPredicate {
    pub fn new(methods: impl Into<OneOrMany>) -> Self {
        Self {
            methods: methods.into().into_sorted(),
        }
    }

    /// The configured methods, sorted.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

impl PredicateIdentity for RequestMethodPredicate {
    fn text(&self) -> String {
        format!("request_method = {}", self.methods.join(","))
    }
}

impl Predicate for RequestMethodPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        let method = request.method();
        self.methods.iter().any(|m| m == method)
    }
}

/// Matches when content negotiation accepts the configured media type.
///
/// The media type is stored verbatim; wildcard and quality handling belong
/// to the request's `Accept` parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptPredicate {
    media_type: String,
}

impl AcceptPredicate {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
        }
    }
}

impl PredicateIdentity for AcceptPredicate {
    fn text(&self) -> String {
        format!("accept = {}", self.media_type)
    }
}

impl Predicate for AcceptPredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        request.accepts(&self.media_type)
    }
}

/// Matches when the request provides an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTypePredicate {
    iface: Interface,
}

impl RequestTypePredicate {
    pub fn new(iface: Interface) -> Self {
        Self { iface }
    }
}

impl PredicateIdentity for RequestTypePredicate {
    fn text(&self) -> String {
        format!("request_type = {}", self.iface)
    }
}

impl Predicate for RequestTypePredicate {
    fn evaluate(&self, _context: Option<&ResourceRef>, request: &dyn PredicateRequest) -> bool {
        request.provides(&self.iface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestInfo;

    #[test]
    fn test_xhr_true() {
        let pred = XhrPredicate::new(true);
        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/").with_xhr(true)));
        assert!(!pred.evaluate(None, &RequestInfo::new("GET", "/").with_xhr(false)));
    }

    #[test]
    fn test_xhr_false() {
        let pred = XhrPredicate::new(false);
        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/")));
        assert!(!pred.evaluate(None, &RequestInfo::new("GET", "/").with_xhr(true)));
    }

    #[test]
    fn test_xhr_text() {
        assert_eq!(XhrPredicate::new(true).text(), "xhr = True");
        assert_eq!(XhrPredicate::new(true).phash(), "xhr = True");
        assert_eq!(XhrPredicate::new(false).text(), "xhr = False");
    }

    #[test]
    fn test_request_method_single() {
        let pred = RequestMethodPredicate::new("GET");
        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/")));
        assert!(!pred.evaluate(None, &RequestInfo::new("POST", "/")));
    }

    #[test]
    fn test_request_method_multi() {
        let pred = RequestMethodPredicate::new(["GET", "HEAD"]);
        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/")));
        assert!(pred.evaluate(None, &RequestInfo::new("HEAD", "/")));
        assert!(!pred.evaluate(None, &RequestInfo::new("POST", "/")));
    }

    #[test]
    fn test_request_method_text_is_sorted() {
        let pred = RequestMethodPredicate::new(["HEAD", "GET"]);
        assert_eq!(pred.text(), "request_method = GET,HEAD");
        assert_eq!(pred.phash(), "request_method = GET,HEAD");
        assert_eq!(pred.methods(), &["GET".to_string(), "HEAD".to_string()]);
    }

    #[test]
    fn test_accept() {
        let pred = AcceptPredicate::new("application/json");
        let json = RequestInfo::new("GET", "/").with_header("Accept", "application/*");
        let html = RequestInfo::new("GET", "/").with_header("Accept", "text/html");

        assert!(pred.evaluate(None, &json));
        assert!(!pred.evaluate(None, &html));
        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/")));
        assert_eq!(pred.text(), "accept = application/json");
    }

    #[test]
    fn test_request_type() {
        let api = Interface::new("app.IApiRequest");
        let pred = RequestTypePredicate::new(api.clone());

        assert!(pred.evaluate(None, &RequestInfo::new("GET", "/").providing(api)));
        assert!(!pred.evaluate(None, &RequestInfo::new("GET", "/")));
        assert_eq!(pred.text(), "request_type = app.IApiRequest");
    }
}
