//! The request view predicates evaluate against.
//!
//! Predicates never parse HTTP themselves. They read a pre-parsed request
//! through [`PredicateRequest`]. [`RequestInfo`] is the provided
//! implementation; it can be assembled by hand or from a `hyper::Request`.

use crate::interface::{Interface, ResourceRef};
use crate::route::MatchDict;
use std::collections::HashMap;
use tracing::debug;

/// Read-only view of an incoming request.
pub trait PredicateRequest {
    /// True if the request was sent by an XHR/AJAX client.
    fn is_xhr(&self) -> bool;

    /// The HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// The percent-decoded request path.
    fn upath_info(&self) -> &str;

    /// A request parameter. [`RequestInfo::from_http`] fills these from the
    /// query string only; add form fields with [`RequestInfo::with_param`].
    fn param(&self, name: &str) -> Option<&str>;

    fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// A header value. Lookup is case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// True if content negotiation accepts `media_type`.
    fn accepts(&self, media_type: &str) -> bool;

    /// The match-dict of the matched route, if any.
    fn matchdict(&self) -> Option<&MatchDict>;

    /// The resource the request was resolved to, if any.
    fn context(&self) -> Option<&ResourceRef>;

    /// True if the request itself provides `iface`.
    fn provides(&self, iface: &Interface) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    main: String,
    sub: String,
    quality: f32,
}

impl MediaRange {
    fn matches(&self, main: &str, sub: &str) -> bool {
        self.main == "*" || (self.main == main && (self.sub == "*" || self.sub == sub))
    }
}

/// A parsed `Accept` header.
///
/// A request without an `Accept` header accepts everything. Ranges with a
/// quality of zero never accept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptHeader {
    ranges: Option<Vec<MediaRange>>,
}

impl AcceptHeader {
    /// Accept any media type.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse an `Accept` header value, skipping malformed entries.
    pub fn parse(value: &str) -> Self {
        let mut ranges = Vec::new();
        for entry in value.split(',') {
            let mut pieces = entry.split(';');
            let media = pieces.next().unwrap_or("").trim().to_ascii_lowercase();
            if media.is_empty() {
                continue;
            }
            let (main, sub) = match media.split_once('/') {
                Some((main, sub)) => (main.trim().to_string(), sub.trim().to_string()),
                None if media == "*" => ("*".to_string(), "*".to_string()),
                None => {
                    debug!(entry = entry, "Skipping malformed Accept entry");
                    continue;
                }
            };
            let quality = pieces
                .filter_map(|p| p.split_once('='))
                .filter(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                .filter_map(|(_, q)| q.trim().parse::<f32>().ok())
                .next()
                .unwrap_or(1.0);
            ranges.push(MediaRange { main, sub, quality });
        }
        Self {
            ranges: Some(ranges),
        }
    }

    /// True if `offer` is acceptable.
    pub fn contains(&self, offer: &str) -> bool {
        let Some(ranges) = &self.ranges else {
            return true;
        };
        let offer = offer.trim().to_ascii_lowercase();
        let (main, sub) = offer.split_once('/').unwrap_or((offer.as_str(), "*"));
        ranges
            .iter()
            .any(|r| r.quality > 0.0 && r.matches(main, sub))
    }
}

/// Parse a query string into a parameter map, percent-decoding values.
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = query {
        for pair in q.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                continue;
            }
            params.insert(decode_component(key), decode_component(value));
        }
    }
    params
}

fn decode_component(raw: &str) -> String {
    decode_lossy(&raw.replace('+', " "))
}

/// Percent-decode `raw`, replacing invalid UTF-8 sequences.
fn decode_lossy(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A pre-parsed request.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    method: String,
    path: String,
    params: HashMap<String, String>,
    /// Header values keyed by lowercased name
    headers: HashMap<String, String>,
    xhr: bool,
    accept: AcceptHeader,
    matchdict: Option<MatchDict>,
    context: Option<ResourceRef>,
    interfaces: Vec<Interface>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Build a request view from a `hyper` request.
    ///
    /// The path is percent-decoded, the query string becomes the parameter
    /// map, the XHR flag comes from `X-Requested-With: XMLHttpRequest` and
    /// the `Accept` header is parsed for negotiation.
    pub fn from_http<B>(req: &hyper::Request<B>) -> Self {
        let path = decode_lossy(req.uri().path());

        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in req.headers() {
            let Ok(value) = value.to_str() else {
                debug!(header = %name, "Skipping non-visible-ASCII header value");
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let xhr = headers
            .get("x-requested-with")
            .map(|v| v == "XMLHttpRequest")
            .unwrap_or(false);
        let accept = headers
            .get("accept")
            .map(|v| AcceptHeader::parse(v))
            .unwrap_or_default();

        Self {
            method: req.method().as_str().to_string(),
            path,
            params: parse_query_string(req.uri().query()),
            headers,
            xhr,
            accept,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "accept" {
            self.accept = AcceptHeader::parse(&value);
        }
        self.headers.insert(name, value);
        self
    }

    pub fn with_xhr(mut self, xhr: bool) -> Self {
        self.xhr = xhr;
        self
    }

    pub fn with_matchdict(mut self, matchdict: MatchDict) -> Self {
        self.matchdict = Some(matchdict);
        self
    }

    pub fn with_context(mut self, context: ResourceRef) -> Self {
        self.context = Some(context);
        self
    }

    /// Declare that the request provides `iface`.
    pub fn providing(mut self, iface: Interface) -> Self {
        self.interfaces.push(iface);
        self
    }

    pub fn set_matchdict(&mut self, matchdict: MatchDict) {
        self.matchdict = Some(matchdict);
    }

    pub fn set_context(&mut self, context: ResourceRef) {
        self.context = Some(context);
    }
}

impl PredicateRequest for RequestInfo {
    fn is_xhr(&self) -> bool {
        self.xhr
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn upath_info(&self) -> &str {
        &self.path
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn accepts(&self, media_type: &str) -> bool {
        self.accept.contains(media_type)
    }

    fn matchdict(&self) -> Option<&MatchDict> {
        self.matchdict.as_ref()
    }

    fn context(&self) -> Option<&ResourceRef> {
        self.context.as_ref()
    }

    fn provides(&self, iface: &Interface) -> bool {
        self.interfaces.iter().any(|i| i.is_or_extends(iface))
    }
}
