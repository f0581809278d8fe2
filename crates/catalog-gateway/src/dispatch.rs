//! Ordered route dispatch.
//!
//! A [`RouteTable`] is a list of `(method, pattern, guards, handler)`
//! registrations. Resolution walks the list **in registration order** and picks
//! the first registration whose method matches exactly and whose pattern
//! matches the path. Specificity plays no part: a literal route such as
//! `/products/search` is only reachable if it is registered before
//! `/products/{id}`, and a second registration of the same method and pattern
//! is never consulted. [`RouteTable::ensure_unique`] turns such shadowed
//! registrations into a startup error.
//!
//! The [`Dispatcher`] drives one request through the pipeline:
//!
//! ```text
//! body parsing ─▶ route resolution ─▶ guards (api key, validation) ─▶ handler
//!                        │                        │                      │
//!                        └── no match: 404 ───────┴──── ApiError ────────┴─▶ one response
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use catalog_store::Store;

use crate::auth::require_api_key;
use crate::error::ApiError;
use crate::state::GatewayState;
use crate::validation::{validate, Schema};

/// A route handler. Handlers run synchronously against the store.
pub type Handler<S> = fn(&GatewayState<S>, &RouteRequest) -> Result<Response, ApiError>;

/// A check bound to a single route registration, run before its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Require a valid `x-api-key` header.
    ApiKey,
    /// Validate the JSON body against a product schema.
    Validate(Schema),
}

impl Guard {
    fn check<S: Store>(self, state: &GatewayState<S>, request: &RouteRequest) -> Result<(), ApiError> {
        match self {
            Self::ApiKey => require_api_key(&request.headers, &state.config.api_key),
            Self::Validate(schema) => validate(request.body.as_ref(), schema),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => write!(f, "api-key"),
            Self::Validate(Schema::Create) => write!(f, "validate:create"),
            Self::Validate(Schema::Update) => write!(f, "validate:update"),
        }
    }
}

/// Errors raised while assembling a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Two registrations share a method and pattern; the later one is unreachable.
    #[error("duplicate route {method} {pattern}: registration #{duplicate} is shadowed by #{first}")]
    Duplicate {
        /// The shared method.
        method: Method,
        /// The pattern of the shadowed registration.
        pattern: String,
        /// Index of the registration that wins.
        first: usize,
        /// Index of the shadowed registration.
        duplicate: usize,
    },
}

// =============================================================================
// Path patterns
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern made of literal segments and `{name}` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/products/{id}`.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .map_or_else(
                        || Segment::Literal(segment.to_string()),
                        |name| Segment::Param(name.to_string()),
                    )
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning the captured parameters.
    ///
    /// Empty segments are ignored, so `/products/` matches `/products`.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::default();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.0.push((name.clone(), part.to_string())),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Whether two patterns match exactly the same set of paths.
    ///
    /// Parameter names are irrelevant: `/a/{id}` and `/a/{key}` overlap fully.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Parameters captured from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Look up a captured parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Requests
// =============================================================================

/// A request after body parsing, as seen by guards and handlers.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path without the query string.
    pub path: String,
    /// Parameters captured by the matched pattern.
    pub params: PathParams,
    /// Decoded query string.
    pub query: HashMap<String, String>,
    /// Request headers.
    pub headers: HeaderMap,
    /// Parsed JSON body, `None` when the body was empty.
    pub body: Option<Value>,
}

impl RouteRequest {
    /// Create a request with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: PathParams::default(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter, treating an empty value as absent.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the body is missing or has the wrong shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| ApiError::Validation("Request body must be a JSON object".into()))?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
    }
}

// =============================================================================
// Route table
// =============================================================================

/// A single registration.
pub struct Route<S> {
    method: Method,
    pattern: PathPattern,
    guards: Vec<Guard>,
    handler: Handler<S>,
}

impl<S> Route<S> {
    /// The registered method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The registered pattern.
    #[must_use]
    pub const fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Guards run before the handler, in order.
    #[must_use]
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }
}

impl<S> fmt::Display for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern.as_str())?;
        if !self.guards.is_empty() {
            let guards: Vec<String> = self.guards.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", guards.join(", "))?;
        }
        Ok(())
    }
}

/// Registration-ordered route table.
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S: Store> RouteTable<S> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration. Earlier registrations take precedence.
    #[must_use]
    pub fn route(mut self, method: Method, pattern: &str, guards: &[Guard], handler: Handler<S>) -> Self {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            guards: guards.to_vec(),
            handler,
        });
        self
    }

    /// Reject registrations shadowed by an earlier one with the same method and pattern.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::Duplicate` for the first shadowed registration found.
    pub fn ensure_unique(&self) -> Result<(), RouteError> {
        for (duplicate, later) in self.routes.iter().enumerate() {
            let earlier = self.routes[..duplicate]
                .iter()
                .position(|r| r.method == later.method && r.pattern.same_shape(&later.pattern));
            if let Some(first) = earlier {
                return Err(RouteError::Duplicate {
                    method: later.method.clone(),
                    pattern: later.pattern.as_str().to_string(),
                    first,
                    duplicate,
                });
            }
        }
        Ok(())
    }

    /// Find the first registration matching `method` and `path`.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(&Route<S>, PathParams)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    /// Resolve a request, run the matched route's guards, then its handler.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when no route matches, or whatever the
    /// first failing guard or the handler returns.
    pub fn dispatch(&self, state: &GatewayState<S>, mut request: RouteRequest) -> Result<Response, ApiError> {
        let (route, params) = self
            .resolve(&request.method, &request.path)
            .ok_or_else(ApiError::route_not_found)?;
        request.params = params;

        for guard in &route.guards {
            guard.check(state, &request)?;
        }

        (route.handler)(state, &request)
    }

    /// Human-readable listing of the registrations, in order.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        self.routes.iter().map(ToString::to_string).collect()
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// A route table bound to the state its handlers run against.
pub struct Dispatcher<S: Store> {
    table: RouteTable<S>,
    state: GatewayState<S>,
}

impl<S: Store> Dispatcher<S> {
    /// Bind `table` to `state`.
    #[must_use]
    pub fn new(table: RouteTable<S>, state: GatewayState<S>) -> Self {
        Self { table, state }
    }

    /// The bound route table.
    #[must_use]
    pub const fn table(&self) -> &RouteTable<S> {
        &self.table
    }

    /// Run one HTTP request through the pipeline, producing exactly one response.
    pub async fn handle(&self, request: Request) -> Response {
        match self.run(request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    async fn run(&self, request: Request) -> Result<Response, ApiError> {
        let (parts, body) = request.into_parts();
        let body = read_json_body(body, self.state.config.max_body_bytes).await?;
        let query = parse_query(&parts.uri)?;

        let request = RouteRequest {
            method: parts.method,
            path: parts.uri.path().to_string(),
            params: PathParams::default(),
            query,
            headers: parts.headers,
            body,
        };

        self.table.dispatch(&self.state, request)
    }
}

/// Axum fallback handler routing every request through the dispatcher.
pub async fn dispatch<S: Store + 'static>(
    State(dispatcher): State<Arc<Dispatcher<S>>>,
    request: Request,
) -> Response {
    dispatcher.handle(request).await
}

async fn read_json_body(body: Body, limit: usize) -> Result<Option<Value>, ApiError> {
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeds_length_limit(&err) {
            ApiError::PayloadTooLarge
        } else {
            ApiError::Validation("Request body could not be read".into())
        }
    })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|_| ApiError::Validation("Malformed JSON body".into()))
}

/// Whether a body read failed on the size limit, either our own or the one
/// applied by `RequestBodyLimitLayer` when no `Content-Length` was sent.
fn exceeds_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

fn parse_query(uri: &Uri) -> Result<HashMap<String, String>, ApiError> {
    if uri.query().is_none() {
        return Ok(HashMap::new());
    }
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(query)| query)
        .map_err(|_| ApiError::Validation("Malformed query string".into()))
}
