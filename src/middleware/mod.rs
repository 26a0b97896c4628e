//! Pass-through handlers.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection,
//! authentication-header inspection. Every middleware here is a
//! [`NestingHandler`] that forwards to the successor the chain composer
//! installed, so it can sit anywhere in a route chain or in the global
//! handlers added with [`prepend`](crate::prepend).
//!
//! - [`from_fn`]: an async function receiving the request and a [`Next`]
//! - [`Trace`]: per-request span with method, path, status, latency

mod trace;

use std::future::Future;

use crate::handler::{BoxFuture, NestingHandler, SharedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use trace::Trace;

/// Handle to the rest of the chain, given to [`from_fn`] middleware.
///
/// Cloning is one `Arc` increment.
#[derive(Clone, Default)]
pub struct Next {
    inner: Option<SharedHandler>,
}

impl Next {
    /// Runs the rest of the chain.
    ///
    /// If nothing was installed after this middleware the answer is the
    /// default `200 OK` with an empty body.
    pub async fn run(&self, req: Request) -> Response {
        match &self.inner {
            Some(next) => next.handle(req).await,
            None => Response::default(),
        }
    }

    /// `true` when this middleware is the last handler of its chain.
    pub fn is_terminal(&self) -> bool {
        self.inner.is_none()
    }

    pub(crate) fn set(&mut self, next: SharedHandler) {
        self.inner = Some(next);
    }
}

/// Builds middleware from an async function.
///
/// ```rust
/// use chainmux::middleware::{self, Next};
/// use chainmux::{Request, Response};
///
/// let stamp = middleware::from_fn(|req: Request, next: Next| async move {
///     let mut res: Response = next.run(req).await;
///     res.headers_mut().insert("x-served-by", "chainmux".parse().unwrap());
///     res
/// });
/// # let _ = stamp;
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FromFn { f, next: Next::default() }
}

/// Middleware returned by [`from_fn`].
pub struct FromFn<F> {
    f: F,
    next: Next,
}

impl<F, Fut, R> NestingHandler for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
        let fut = (self.f)(req, self.next.clone());
        Box::pin(async move { fut.await.into_response() })
    }

    fn install(&mut self, next: SharedHandler) {
        self.next.set(next);
    }
}
