//! Options: deferred mutations of the routes builder.
//!
//! Everything a pipeline is made of is declared as a [`RouteOption`]: route
//! registrations ([`register`](crate::register), [`get`](crate::get), ...),
//! global handlers ([`prepend`]), hook overrides ([`not_found`],
//! [`method_not_allowed`], [`on_panic`]) and groups of those ([`compound`]).
//! Nothing happens until [`build`](crate::build) applies them, one after the
//! other, in the order they were declared.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::builder::RoutesBuilder;
use crate::error::Error;
use crate::handler::NestingHandler;
use crate::request::Request;
use crate::response::Response;

type Apply = Box<dyn FnOnce(&mut RoutesBuilder) -> Result<(), Error>>;

/// One unit of pipeline configuration.
///
/// Options are plain data until applied, and are applied exactly once.
/// They are not `Send`: a pipeline is assembled on a single thread.
#[must_use = "options do nothing until passed to `build`"]
pub struct RouteOption(Apply);

impl RouteOption {
    pub(crate) fn new(apply: impl FnOnce(&mut RoutesBuilder) -> Result<(), Error> + 'static) -> Self {
        Self(Box::new(apply))
    }

    pub(crate) fn apply(self, builder: &mut RoutesBuilder) -> Result<(), Error> {
        (self.0)(builder)
    }
}

/// Answers requests whose path matches no route. Last one declared wins.
///
/// Without it the router answers a bare `404 Not Found`.
pub fn not_found(handler: impl NestingHandler) -> RouteOption {
    RouteOption::new(move |builder| {
        builder.router.not_found = Some(Arc::new(handler));
        Ok(())
    })
}

/// Answers requests whose path matches a route under other methods only.
/// Last one declared wins.
///
/// The router adds the `Allow` header to whatever this handler returns.
/// Without it the router answers a bare `405 Method Not Allowed`.
pub fn method_not_allowed(handler: impl NestingHandler) -> RouteOption {
    RouteOption::new(move |builder| {
        builder.router.method_not_allowed = Some(Arc::new(handler));
        Ok(())
    })
}

/// Recovers panics raised while a request is routed and handled. Last one
/// declared wins.
///
/// `callback` receives the request as it reached the router and the exact
/// panic payload, and must produce the whole response. Without a callback,
/// panics propagate to whoever invoked the pipeline.
///
/// Setting a callback costs one [`Request`] clone per request, taken before
/// dispatch so the callback still has it after the original was consumed.
/// The body is shared, not copied, but the header map is duplicated. Path
/// parameters are not filled in on that copy.
pub fn on_panic<F>(callback: F) -> RouteOption
where
    F: Fn(Request, Box<dyn Any + Send>) -> Response + Send + Sync + 'static,
{
    RouteOption::new(move |builder| {
        builder.router.panic_hook = Some(Arc::new(callback));
        Ok(())
    })
}

/// Runs `handlers` before routing, for every request.
///
/// The handlers are inserted in front of the global handlers accumulated so
/// far. **Repeated use inverts declaration order**: the handlers of the
/// prepend applied last run first.
///
/// ```text
/// build([prepend(chain![a, b]), prepend(chain![c]), get("/", ...)])
///
/// request ─► c ─► a ─► b ─► router ─► route chain
/// ```
///
/// To keep global handlers in reading order, declare them in a single
/// `prepend`.
pub fn prepend(handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    RouteOption::new(move |builder| {
        debug!(count = handlers.len(), "global handlers prepended");
        let mut globals = handlers;
        globals.append(&mut builder.handlers);
        builder.handlers = globals;
        Ok(())
    })
}

/// Groups options into one. Applying the group applies each member in
/// order, at the group's own position in the option list.
///
/// ```rust
/// use chainmux::{RouteOption, chain, compound, get, handler, put};
///
/// fn user_routes() -> RouteOption {
///     compound([
///         get("/users/{id}", chain![handler::from_fn(|_req| async { "user" })]),
///         put("/users/{id}", chain![handler::from_fn(|_req| async { "updated" })]),
///     ])
/// }
/// # let _ = user_routes();
/// ```
pub fn compound(options: impl IntoIterator<Item = RouteOption>) -> RouteOption {
    let options: Vec<RouteOption> = options.into_iter().collect();
    RouteOption::new(move |builder| {
        options.into_iter().try_for_each(|option| option.apply(builder))
    })
}
