//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. Path
//! parameters use `{name}` syntax; `{name:int}` additionally requires the
//! segment to be a non-negative integer. A segment that fails its converter
//! does not match the route at all, so the request ends as `404 Not Found`
//! without touching the handler.
//!
//! A router carries one shared state value, handed to every
//! [`Stateful`](crate::handler::Stateful) handler as an `Arc<St>`.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// A registered handler plus the converters its pattern declared.
struct Route<St> {
    handler: BoxedHandler<St>,
    int_params: Vec<String>,
}

enum Lookup<St> {
    Found(BoxedHandler<St>, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or drive it directly with [`Router::dispatch`].
pub struct Router<St = ()> {
    state: Arc<St>,
    routes: HashMap<Method, MatchitRouter<Route<St>>>,
}

impl Router {
    /// A router without shared state.
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl<St: Send + Sync + 'static> Router<St> {
    /// A router whose stateful handlers all receive `state`.
    pub fn with_state(state: St) -> Self {
        Self { state: Arc::new(state), routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust
    /// # use http::{Method, StatusCode};
    /// # use workprofile::{Request, Router};
    /// # async fn delete(_: Request) -> StatusCode { StatusCode::NO_CONTENT }
    /// Router::new().on(Method::DELETE, "/delete/{id:int}", delete);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed, names an unknown converter, or
    /// conflicts with a route already registered for the method.
    pub fn on<M>(self, method: Method, path: &str, handler: impl Handler<M, St>) -> Self {
        self.add(&[method], path, handler.into_boxed_handler())
    }

    /// Register one handler under several methods at once.
    pub fn on_each<M>(self, methods: &[Method], path: &str, handler: impl Handler<M, St>) -> Self {
        self.add(methods, path, handler.into_boxed_handler())
    }

    pub fn get<M>(self, path: &str, handler: impl Handler<M, St>) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn delete<M>(self, path: &str, handler: impl Handler<M, St>) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn add(mut self, methods: &[Method], path: &str, handler: BoxedHandler<St>) -> Self {
        let (pattern, int_params) =
            compile(path).unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        for method in methods {
            let route = Route { handler: Arc::clone(&handler), int_params: int_params.clone() };
            self.routes
                .entry(method.clone())
                .or_default()
                .insert(pattern.as_str(), route)
                .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        }
        self
    }

    /// Routes one request and runs its handler.
    ///
    /// Unmatched paths get `404`; a path served only under other methods gets
    /// `405` with an `allow` header.
    pub async fn dispatch(&self, req: http::Request<Bytes>) -> Response {
        let (head, body) = req.into_parts();
        match self.lookup(&head.method, head.uri.path()) {
            Lookup::Found(handler, params) => {
                handler.call(Arc::clone(&self.state), Request::new(head, body, params)).await
            }
            Lookup::MethodNotAllowed(allowed) => {
                let allowed = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
                let builder = Response::builder().status(StatusCode::METHOD_NOT_ALLOWED);
                match HeaderValue::from_str(&allowed) {
                    Ok(value) => builder.header(ALLOW, value).no_body(),
                    Err(_) => builder.no_body(),
                }
            }
            Lookup::NotFound => Response::status(StatusCode::NOT_FOUND),
        }
    }

    fn lookup(&self, method: &Method, path: &str) -> Lookup<St> {
        if let Some((handler, params)) = self.routes.get(method).and_then(|tree| resolve(tree, path)) {
            return Lookup::Found(handler, params);
        }

        let mut allowed: Vec<Method> = self
            .routes
            .iter()
            .filter(|(m, tree)| *m != method && resolve(tree, path).is_some())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Lookup::MethodNotAllowed(allowed)
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn resolve<St>(
    tree: &MatchitRouter<Route<St>>,
    path: &str,
) -> Option<(BoxedHandler<St>, HashMap<String, String>)> {
    let matched = tree.at(path).ok()?;
    let route = matched.value;
    let converted = route
        .int_params
        .iter()
        .all(|name| matched.params.get(name).is_some_and(is_uint));
    if !converted {
        return None;
    }

    let params = matched.params.iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    Some((Arc::clone(&route.handler), params))
}

fn is_uint(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit()) && segment.parse::<u64>().is_ok()
}

/// Rewrites `{name:int}` into matchit's `{name}` and collects the typed names.
fn compile(path: &str) -> Result<(String, Vec<String>), String> {
    let mut pattern = String::with_capacity(path.len());
    let mut int_params = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let close = rest[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| "unclosed `{`".to_owned())?;
        pattern.push_str(&rest[..open]);

        let inner = &rest[open + 1..close];
        match inner.split_once(':') {
            None => {
                pattern.push('{');
                pattern.push_str(inner);
                pattern.push('}');
            }
            Some((name, "int")) => {
                pattern.push('{');
                pattern.push_str(name);
                pattern.push('}');
                int_params.push(name.to_owned());
            }
            Some((_, other)) => return Err(format!("unknown converter `{other}`")),
        }
        rest = &rest[close + 1..];
    }
    pattern.push_str(rest);

    Ok((pattern, int_params))
}
