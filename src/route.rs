//! Route registration.
//!
//! One declaration may register the same chain under several methods and
//! several paths: both lists are `|`-separated and every method x path pair
//! is registered.
//!
//! ```rust
//! use chainmux::{chain, handler, register};
//!
//! // GET /hi, GET /bye, PUT /hi, PUT /bye
//! let _ = register("GET|PUT", "/hi|/bye", chain![handler::from_fn(|_req| async { "hello" })]);
//! ```
//!
//! The chain is composed once and the same instance answers every pair, so
//! any state a handler keeps is shared by all of them. Register separately
//! when each alias needs its own.
//!
//! Path parameters use the router's `{name}` / `{*name}` syntax. The
//! `:name` and `*name` segment forms are accepted too and rewritten.

use std::sync::Arc;

use http::Method;
use tracing::debug;

use crate::chain::compose;
use crate::error::Error;
use crate::handler::NestingHandler;
use crate::option::RouteOption;

const SEPARATOR: char = '|';

/// Registers `handlers`, composed into one chain, under every combination
/// of `methods` and `paths`.
///
/// Configuration mistakes (no handlers, an invalid method token, a path not
/// starting with `/`, a conflicting route) make [`build`](crate::build) fail.
pub fn register(methods: &str, paths: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    let methods = methods.to_owned();
    let paths = paths.to_owned();
    RouteOption::new(move |builder| {
        let chain = compose(handlers).ok_or_else(|| Error::EmptyChain {
            methods: methods.clone(),
            paths: paths.clone(),
        })?;

        for method in methods.split(SEPARATOR) {
            let method = parse_method(method)?;
            for path in paths.split(SEPARATOR) {
                let pattern = to_router_syntax(path)?;
                debug!(%method, path = %pattern, "route registered");
                builder.router.insert(method.clone(), &pattern, Arc::clone(&chain))?;
            }
        }
        Ok(())
    })
}

pub fn get(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::GET.as_str(), path, handlers)
}

pub fn put(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::PUT.as_str(), path, handlers)
}

pub fn post(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::POST.as_str(), path, handlers)
}

pub fn delete(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::DELETE.as_str(), path, handlers)
}

pub fn patch(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::PATCH.as_str(), path, handlers)
}

pub fn head(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::HEAD.as_str(), path, handlers)
}

/// Registers an explicit `OPTIONS` route, which takes precedence over the
/// router's automatic `Allow` answer for that path.
pub fn options(path: &str, handlers: Vec<Box<dyn NestingHandler>>) -> RouteOption {
    register(Method::OPTIONS.as_str(), path, handlers)
}

/// Method tokens are case-sensitive: `get` is an extension method, not `GET`.
fn parse_method(token: &str) -> Result<Method, Error> {
    Method::from_bytes(token.as_bytes()).map_err(|_| Error::InvalidMethod(token.to_owned()))
}

/// Rewrites `:name` segments to `{name}` and `*name` segments to `{*name}`.
fn to_router_syntax(path: &str) -> Result<String, Error> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(path.to_owned()));
    }

    let segments: Vec<String> = path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{name}}}")
            } else {
                segment.to_owned()
            }
        })
        .collect();
    Ok(segments.join("/"))
}
