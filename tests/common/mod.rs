//! Shared fixtures for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::BytesMut;
use chainmux::{BoxFuture, NestingHandler, Pipeline, Request, Response, SharedHandler};
use http::{Method, StatusCode, Uri};

/// Writes its id in front of whatever its successor wrote, and remembers
/// the last request it saw.
pub struct FakeHandler {
    id: String,
    next: Option<SharedHandler>,
    seen: Arc<Mutex<Option<Request>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeHandler {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            next: None,
            seen: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Handle on the last request this handler received.
    pub fn seen(&self) -> Arc<Mutex<Option<Request>>> {
        Arc::clone(&self.seen)
    }

    /// Handle on the number of times this handler ran.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl NestingHandler for FakeHandler {
    fn handle<'a>(&'a self, req: Request) -> BoxFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(req.clone());

            let mut res = match &self.next {
                Some(next) => next.handle(req).await,
                None => Response::default(),
            };
            let mut body = BytesMut::from(self.id.as_bytes());
            body.extend_from_slice(res.body());
            *res.body_mut() = body.freeze();
            res
        })
    }

    fn install(&mut self, next: SharedHandler) {
        self.next = Some(next);
    }
}

/// Answers `404` with a fixed body, never calls onward.
pub struct FakeNotFoundHandler(pub &'static str);

impl NestingHandler for FakeNotFoundHandler {
    fn handle<'a>(&'a self, _req: Request) -> BoxFuture<'a> {
        Box::pin(async move {
            let mut res = Response::text(self.0);
            res.set_status(StatusCode::NOT_FOUND);
            res
        })
    }

    fn install(&mut self, _next: SharedHandler) {}
}

pub async fn serve(app: &Pipeline, method: &str, path: &str) -> Response {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let uri: Uri = path.parse().unwrap();
    app.handle(Request::new(method, uri)).await
}

pub fn body(res: &Response) -> String {
    String::from_utf8_lossy(res.body()).trim().to_owned()
}
