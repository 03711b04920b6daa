//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is the read-only view of an already-dispatched
//! request: method, URI, headers, matched route parameters and the peer
//! address.

use crate::error::ExtractionError;
use crate::params::Params;
use crate::query::parse_query;
use http::header::{HOST, USER_AGENT};
use http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;

/// Context providing access to the parts of an HTTP request the edge layer
/// reads.
///
/// # Example
///
/// ```rust
/// use edge_extract::{ExtractionContext, Params};
/// use http::{HeaderMap, Method, Uri};
///
/// let mut params = Params::new();
/// params.push("tender_id", "abc123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/api/2.5/tenders/abc123?opt_pretty=1"),
///     HeaderMap::new(),
///     params,
/// );
///
/// assert_eq!(ctx.path(), "/api/2.5/tenders/abc123");
/// assert_eq!(ctx.path_params().get("tender_id"), Some("abc123"));
/// assert_eq!(ctx.query_params().unwrap().get("opt_pretty"), Some("1"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    path_params: Params,
    remote_addr: Option<SocketAddr>,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, path_params: Params) -> Self {
        Self {
            method,
            uri,
            headers,
            path_params,
            remote_addr: None,
        }
    }

    /// Creates a context from request parts.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, path_params: Params) -> Self {
        Self::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
            path_params,
        )
    }

    /// Sets the peer address.
    #[must_use]
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the raw, still percent-encoded path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the percent-decoded path. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn decoded_path(&self) -> String {
        percent_decode_str(self.path())
            .decode_utf8_lossy()
            .into_owned()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Parses the query string into ordered parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query string is not valid URL encoding.
    pub fn query_params(&self) -> Result<Params, ExtractionError> {
        parse_query(self.query_string())
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the `User-Agent` header.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
    }

    /// Returns the host, from the URI authority or the `Host` header.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.uri
            .authority()
            .map(http::uri::Authority::as_str)
            .or_else(|| self.headers.get(HOST).and_then(|v| v.to_str().ok()))
    }

    /// Reconstructs the full request URL: scheme, host, path and query.
    ///
    /// The scheme defaults to `http` when the URI carries none.
    #[must_use]
    pub fn current_url(&self) -> String {
        let scheme = self.uri.scheme_str().unwrap_or("http");
        let host = self.host().unwrap_or_default();
        let path_and_query = self
            .uri
            .path_and_query()
            .map_or("/", http::uri::PathAndQuery::as_str);
        format!("{scheme}://{host}{path_and_query}")
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns the peer address.
    #[must_use]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}

/// Builder for constructing an `ExtractionContext`.
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    path_params: Params,
    remote_addr: Option<SocketAddr>,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid values are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Sets the peer address.
    #[must_use]
    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            path_params: self.path_params,
            remote_addr: self.remote_addr,
        }
    }
}
