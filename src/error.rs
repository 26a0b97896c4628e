//! Unified error type.

use thiserror::Error;

/// The error type returned by chainmux's fallible operations.
///
/// Routing misses (404, 405) and handler panics are not errors: they are
/// answered by the router's hooks. This type covers configuration mistakes
/// caught while the pipeline is built, and infrastructure failures in
/// [`Server`](crate::Server).
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A route was registered without any handler to run.
    #[error("route `{methods} {paths}` has an empty handler chain")]
    EmptyChain { methods: String, paths: String },

    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),

    #[error("path `{0}` must begin with '/'")]
    InvalidPath(String),

    /// The router refused the route, usually because it conflicts with one
    /// registered earlier.
    #[error("invalid route `{method} {path}`: {source}")]
    InvalidRoute {
        method: http::Method,
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}
