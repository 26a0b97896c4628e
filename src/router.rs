//! Radix-tree request router, the terminal link of every pipeline.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. The
//! router never redirects: a trailing slash or a wrongly cased path is
//! simply another path. What it does on a miss:
//!
//! | Situation                                   | Answer                                      |
//! |---------------------------------------------|---------------------------------------------|
//! | `OPTIONS`, no explicit route, path known    | `200` with `Allow`                          |
//! | path known under other methods              | `Allow` + method-not-allowed hook, or `405` |
//! | path unknown                                | not-found hook, or `404`                    |
//!
//! When a panic hook is set, the whole dispatch runs behind a
//! `catch_unwind` boundary, so a panic raised by any handler of the matched
//! chain (or by a hook) ends up in the panic hook instead of unwinding into
//! the transport. This requires `panic = "unwind"`, the default profile
//! setting.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::{debug, error, trace};

use crate::error::Error;
use crate::handler::{BoxFuture, NestingHandler, SharedHandler};
use crate::request::{Params, Request};
use crate::response::Response;

/// Callback invoked with a snapshot of the request and the panic payload.
///
/// It is fully responsible for the response: nothing is written for it.
pub(crate) type PanicHook = Arc<dyn Fn(Request, Box<dyn Any + Send>) -> Response + Send + Sync>;

#[derive(Default)]
pub(crate) struct Router {
    routes: HashMap<Method, MatchitRouter<SharedHandler>>,
    pub(crate) not_found: Option<SharedHandler>,
    pub(crate) method_not_allowed: Option<SharedHandler>,
    pub(crate) panic_hook: Option<PanicHook>,
}

impl Router {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for a method + path pair.
    ///
    /// `path` is in the router's own syntax (`{name}`, `{*name}`).
    pub(crate) fn insert(&mut self, method: Method, path: &str, handler: SharedHandler) -> Result<(), Error> {
        self.routes
            .entry(method.clone())
            .or_insert_with(MatchitRouter::new)
            .insert(path, handler)
            .map_err(|source| Error::InvalidRoute { method, path: path.to_owned(), source })
    }

    async fn serve(&self, req: Request) -> Response {
        let Some(hook) = &self.panic_hook else {
            return self.dispatch(req).await;
        };

        // Headers are copied, the body is shared.
        let snapshot = req.clone();
        match AssertUnwindSafe(self.dispatch(req)).catch_unwind().await {
            Ok(res) => res,
            Err(fault) => {
                error!(method = %snapshot.method(), path = %snapshot.path(), "handler panicked, recovering");
                hook(snapshot, fault)
            }
        }
    }

    async fn dispatch(&self, mut req: Request) -> Response {
        if let Some((handler, params)) = self.lookup(req.method(), req.path()) {
            req.params = params;
            return handler.handle(req).await;
        }

        if *req.method() == Method::OPTIONS {
            if let Some(allow) = self.allowed(req.path(), &Method::OPTIONS) {
                let mut res = Response::default();
                res.headers_mut().insert(ALLOW, allow);
                return res;
            }
        } else if let Some(allow) = self.allowed(req.path(), req.method()) {
            debug!(method = %req.method(), path = %req.path(), "method not allowed");
            return match &self.method_not_allowed {
                Some(hook) => {
                    let mut res = hook.handle(req).await;
                    res.headers_mut().insert(ALLOW, allow);
                    res
                }
                None => {
                    let mut res = Response::status(StatusCode::METHOD_NOT_ALLOWED);
                    res.headers_mut().insert(ALLOW, allow);
                    res
                }
            };
        }

        debug!(method = %req.method(), path = %req.path(), "no route");
        match &self.not_found {
            Some(hook) => hook.handle(req).await,
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(SharedHandler, Params)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        Some((handler, Params::from(matched.params)))
    }

    /// The `Allow` value for `path`: every method other than `method` with a
    /// matching route, plus `OPTIONS`, sorted. `None` if no method matches.
    /// The server-wide `*` path allows every registered method.
    fn allowed(&self, path: &str, method: &Method) -> Option<HeaderValue> {
        let mut allowed: Vec<&str> = self.routes.iter()
            .filter(|(m, _)| *m != method && **m != Method::OPTIONS)
            .filter(|(_, tree)| path == "*" || tree.at(path).is_ok())
            .map(|(m, _)| m.as_str())
            .collect();

        if allowed.is_empty() {
            return None;
        }
        allowed.push(Method::OPTIONS.as_str());
        allowed.sort_unstable();
        allowed.dedup();

        HeaderValue::from_str(&allowed.join(", ")).ok()
    }
}

/// The router is always the last link, so it has no successor to call.
impl NestingHandler for Router {
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
        Box::pin(self.serve(req))
    }

    fn install(&mut self, _next: SharedHandler) {
        trace!("router is terminal, ignoring successor");
    }
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use super::*;
    use crate::handler;

    fn router_with(routes: &[(Method, &str, &'static str)]) -> Router {
        let mut router = Router::new();
        for (method, path, body) in routes {
            let body = *body;
            router
                .insert(method.clone(), path, Arc::new(handler::from_fn(move |_req| async move { body })))
                .unwrap();
        }
        router
    }

    fn request(method: Method, path: &'static str) -> Request {
        Request::new(method, Uri::from_static(path))
    }

    #[tokio::test]
    async fn dispatches_on_method_and_path() {
        let router = router_with(&[(Method::GET, "/hi", "get"), (Method::PUT, "/hi", "put")]);

        assert_eq!(&router.serve(request(Method::GET, "/hi")).await.body()[..], b"get");
        assert_eq!(&router.serve(request(Method::PUT, "/hi")).await.body()[..], b"put");
    }

    #[tokio::test]
    async fn allow_lists_matching_methods_sorted_with_options() {
        let router = router_with(&[
            (Method::PUT, "/hi", "put"),
            (Method::GET, "/hi", "get"),
            (Method::POST, "/other", "post"),
        ]);

        let res = router.serve(request(Method::DELETE, "/hi")).await;
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[ALLOW], "GET, OPTIONS, PUT");
    }

    #[tokio::test]
    async fn automatic_options_answers_with_allow() {
        let router = router_with(&[(Method::GET, "/hi", "get")]);

        let res = router.serve(request(Method::OPTIONS, "/hi")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.headers()[ALLOW], "GET, OPTIONS");
    }

    #[tokio::test]
    async fn server_wide_options_lists_every_method() {
        let router = router_with(&[(Method::GET, "/a", "a"), (Method::POST, "/b", "b")]);

        let res = router.serve(request(Method::OPTIONS, "*")).await;
        assert_eq!(res.headers()[ALLOW], "GET, OPTIONS, POST");
    }

    #[tokio::test]
    async fn options_on_unknown_path_is_not_found() {
        let router = router_with(&[(Method::GET, "/hi", "get")]);

        let res = router.serve(request(Method::OPTIONS, "/nope")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicting_routes_are_rejected() {
        let mut router = router_with(&[(Method::GET, "/users/{id}", "a")]);
        let err = router
            .insert(Method::GET, "/users/{id}", Arc::new(handler::from_fn(|_req| async { "b" })))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRoute { .. }));
    }
}
