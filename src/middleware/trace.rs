use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::Next;
use crate::handler::{BoxFuture, NestingHandler, SharedHandler};
use crate::request::Request;

/// Opens a `request` span carrying the method and path, runs the rest of the
/// chain inside it, and logs the status and latency once the response is
/// ready.
///
/// Prepend it to trace every request, routed or not:
///
/// ```rust
/// use chainmux::{build, chain, get, handler, middleware, prepend};
///
/// let app = build([
///     prepend(chain![middleware::Trace::new()]),
///     get("/", chain![handler::from_fn(|_req| async { "hello" })]),
/// ]);
/// assert!(app.is_ok());
/// ```
#[derive(Default)]
pub struct Trace {
    next: Next,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NestingHandler for Trace {
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        Box::pin(
            async move {
                let started = Instant::now();
                let res = self.next.run(req).await;
                info!(
                    status = res.status_code().as_u16(),
                    latency = ?started.elapsed(),
                    "request completed"
                );
                res
            }
            .instrument(span),
        )
    }

    fn install(&mut self, next: SharedHandler) {
        self.next.set(next);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::{Method, StatusCode, Uri};

    use super::*;
    use crate::handler;

    #[tokio::test]
    async fn passes_the_response_through_untouched() {
        let mut trace = Trace::new();
        trace.install(Arc::new(handler::from_fn(|_req| async { StatusCode::IM_A_TEAPOT })));

        let res = trace.handle(Request::new(Method::GET, Uri::from_static("/tea"))).await;
        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    }
}
