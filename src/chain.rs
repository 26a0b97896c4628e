//! Chain composition.

use std::sync::Arc;

use crate::handler::{NestingHandler, SharedHandler};

/// Links `handlers` so each one is told the next is its successor, and
/// returns the first as the chain's entry point.
///
/// Wiring runs back to front: the last handler is frozen as-is (it is the
/// terminal, e.g. the router), then every predecessor receives the already
/// frozen successor before being frozen itself. A single handler is returned
/// unchanged. Returns `None` for an empty list, which has no terminal to call.
pub fn compose(mut handlers: Vec<Box<dyn NestingHandler>>) -> Option<SharedHandler> {
    let terminal = handlers.pop()?;
    Some(compose_onto(handlers, Arc::from(terminal)))
}

/// Like [`compose`], with an already frozen `terminal` appended as the last
/// link. With no `handlers` the terminal itself is the entry point.
pub fn compose_onto(handlers: Vec<Box<dyn NestingHandler>>, terminal: SharedHandler) -> SharedHandler {
    handlers.into_iter().rev().fold(terminal, |next, mut handler| {
        handler.install(next);
        Arc::from(handler)
    })
}
