//! The routes builder: from an option list to one executable pipeline.

use std::sync::Arc;

use tracing::debug;

use crate::chain::compose_onto;
use crate::error::Error;
use crate::handler::{NestingHandler, SharedHandler};
use crate::option::RouteOption;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// Build-time state mutated by options. Lives for the duration of one
/// [`build`] call.
pub(crate) struct RoutesBuilder {
    pub(crate) handlers: Vec<Box<dyn NestingHandler>>,
    pub(crate) router: Router,
}

impl RoutesBuilder {
    fn new() -> Self {
        Self { handlers: Vec::new(), router: Router::new() }
    }

    fn apply(&mut self, options: impl IntoIterator<Item = RouteOption>) -> Result<(), Error> {
        options.into_iter().try_for_each(|option| option.apply(self))
    }

    /// Global handlers first, the router last.
    fn finish(self) -> Pipeline {
        debug!(global_handlers = self.handlers.len(), "pipeline built");
        let router: SharedHandler = Arc::new(self.router);
        Pipeline { entry: compose_onto(self.handlers, router) }
    }
}

/// Applies `options` in declaration order and assembles the pipeline.
///
/// Fails on the first configuration error; no partially configured pipeline
/// is ever returned.
///
/// ```rust
/// use chainmux::{Request, build, chain, get, handler};
/// use http::{Method, Uri};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), chainmux::Error> {
/// let app = build([
///     get("/users/:id", chain![handler::from_fn(|req: Request| async move {
///         format!("user {}", req.param("id").unwrap_or_default())
///     })]),
/// ])?;
///
/// let res = app.handle(Request::new(Method::GET, Uri::from_static("/users/42"))).await;
/// assert_eq!(&res.body()[..], b"user 42");
/// # Ok(())
/// # }
/// ```
pub fn build(options: impl IntoIterator<Item = RouteOption>) -> Result<Pipeline, Error> {
    let mut builder = RoutesBuilder::new();
    builder.apply(options)?;
    Ok(builder.finish())
}

/// The assembled request handler: global handlers, then the router.
///
/// Immutable and cheap to clone; invoke it concurrently from as many tasks
/// as you like. Serve it with [`Server`](crate::Server) or call
/// [`handle`](Pipeline::handle) directly.
#[derive(Clone)]
pub struct Pipeline {
    entry: SharedHandler,
}

impl Pipeline {
    pub async fn handle(&self, req: Request) -> Response {
        self.entry.handle(req).await
    }
}
