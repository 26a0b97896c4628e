//! The nesting handler contract and leaf handlers built from async functions.
//!
//! # How chains are stored
//!
//! A chain mixes handlers of *different* concrete types, so every handler is
//! stored as a trait object. While a chain is being wired each handler is a
//! `Box<dyn NestingHandler>` (it still needs `&mut self` for
//! [`install`](NestingHandler::install)); once wired it is frozen behind an
//! `Arc`, the [`SharedHandler`] every route entry and predecessor points to:
//!
//! ```text
//! Box<dyn NestingHandler>  ── install(next) ──►  Arc<dyn NestingHandler>
//!        (build time, mutable)                    (request time, shared)
//! ```
//!
//! The only runtime cost per hop is one virtual call and one boxed future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::trace;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// Borrows the handler for `'a`, so implementations can reach their
/// installed successor through `&self` without cloning it.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// A wired handler, shared by every route entry and predecessor that points
/// to it and by concurrent requests.
pub type SharedHandler = Arc<dyn NestingHandler>;

/// A request handler that can be told which handler comes next.
///
/// The contract does not chain automatically: an implementation that holds
/// a successor decides whether and when to call it. Not calling it
/// short-circuits the rest of the chain (an auth check answering `401`,
/// for instance).
///
/// ```rust
/// use chainmux::{BoxFuture, NestingHandler, Request, Response, SharedHandler};
/// use http::StatusCode;
///
/// #[derive(Default)]
/// struct RequireToken {
///     next: Option<SharedHandler>,
/// }
///
/// impl NestingHandler for RequireToken {
///     fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
///         Box::pin(async move {
///             let authorized = req.header("authorization").is_some();
///             match &self.next {
///                 Some(next) if authorized => next.handle(req).await,
///                 _ => Response::status(StatusCode::UNAUTHORIZED),
///             }
///         })
///     }
///
///     fn install(&mut self, next: SharedHandler) {
///         self.next = Some(next);
///     }
/// }
/// ```
pub trait NestingHandler: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a>;

    /// Records the successor. The composer calls this at most once per
    /// handler; implementations that hold a successor replace it if called
    /// again.
    fn install(&mut self, next: SharedHandler);
}

/// Boxes a list of heterogeneous handlers into the `Vec` that route
/// registration and [`prepend`](crate::prepend) take.
///
/// ```rust
/// use chainmux::{chain, handler, middleware};
///
/// let handlers = chain![middleware::Trace::new(), handler::from_fn(|_req| async { "hi" })];
/// assert_eq!(handlers.len(), 2);
/// ```
#[macro_export]
macro_rules! chain {
    ($($handler:expr),* $(,)?) => {
        ::std::vec![$(::std::boxed::Box::new($handler) as ::std::boxed::Box<dyn $crate::NestingHandler>),*]
    };
}

/// Turns an async function into a leaf [`NestingHandler`].
///
/// Accepts any `Fn(Request) -> impl Future<Output = impl IntoResponse>`:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// A leaf never calls onward, so it belongs at the end of a chain. Handlers
/// placed after it are never reached.
pub fn from_fn<F, Fut, R>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FnHandler(f)
}

/// Leaf handler returned by [`from_fn`].
pub struct FnHandler<F>(F);

impl<F, Fut, R> NestingHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }

    fn install(&mut self, _next: SharedHandler) {
        trace!("leaf handler ignores its successor");
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode, Uri};

    use super::*;

    #[tokio::test]
    async fn fn_handler_converts_its_output() {
        let handler = from_fn(|req: Request| async move {
            (StatusCode::ACCEPTED, format!("{} {}", req.method(), req.path()))
        });

        let res = handler.handle(Request::new(Method::POST, Uri::from_static("/jobs"))).await;
        assert_eq!(res.status_code(), StatusCode::ACCEPTED);
        assert_eq!(&res.body()[..], b"POST /jobs");
    }

    #[tokio::test]
    async fn fn_handler_never_calls_an_installed_successor() {
        let mut leaf = from_fn(|_req| async { "leaf" });
        leaf.install(Arc::new(from_fn(|_req| async { "unreachable" })));

        let res = leaf.handle(Request::new(Method::GET, Uri::from_static("/"))).await;
        assert_eq!(&res.body()[..], b"leaf");
    }
}
