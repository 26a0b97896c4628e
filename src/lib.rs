//! # chainmux
//!
//! Declare an HTTP pipeline as a list of options: which handler chains
//! answer which method/path combinations, which handlers run for every
//! request before routing, and what happens on a miss or a panic.
//!
//! ## The model
//!
//! Everything is a [`NestingHandler`]: a handler that can be told which
//! handler comes next. A chain is a list of them, wired so each may call its
//! successor. A pipeline is one chain whose last link is the router, and the
//! router in turn dispatches to per-route chains:
//!
//! ```text
//! request ─► global handlers ─► router ─┬─► GET /users/{id}  chain
//!                                       ├─► PUT /users/{id}  chain
//!                                       └─► not found / method not allowed
//! ```
//!
//! Options are applied in declaration order by [`build`], which returns the
//! immutable [`Pipeline`]. Configuration mistakes (an empty chain, a bad
//! method token, conflicting routes) are reported by `build`, never at
//! request time.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chainmux::{Request, Response, Server, build, chain, get, handler, middleware, prepend, register};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chainmux::Error> {
//!     let app = build([
//!         prepend(chain![middleware::Trace::new()]),
//!         get("/users/:id", chain![handler::from_fn(get_user)]),
//!         register("PUT|PATCH", "/users/:id", chain![handler::from_fn(update_user)]),
//!     ])?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//!
//! async fn update_user(_req: Request) -> http::StatusCode {
//!     http::StatusCode::NO_CONTENT
//! }
//! ```

mod builder;
mod chain;
mod error;
mod option;
mod request;
mod response;
mod route;
mod router;
mod server;

pub mod handler;
pub mod middleware;

pub use builder::{Pipeline, build};
pub use chain::{compose, compose_onto};
pub use error::Error;
pub use handler::{BoxFuture, NestingHandler, SharedHandler};
pub use option::{RouteOption, compound, method_not_allowed, not_found, on_panic, prepend};
pub use request::{Params, Request};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use route::{delete, get, head, options, patch, post, put, register};
pub use server::Server;
