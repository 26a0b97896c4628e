//! Minimal chainmux example: JSON endpoints behind global tracing and an
//! auth check, with custom miss and panic handling.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -H 'authorization: token' -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42 -H 'authorization: token'
//!   curl -X PATCH -i http://localhost:3000/users/42      # 405 with Allow
//!   curl -X OPTIONS -i http://localhost:3000/users/42    # 200 with Allow
//!   curl http://localhost:3000/boom

use chainmux::middleware::{self, Next};
use chainmux::{
    Request, Response, Server, build, chain, compound, delete, get, handler, not_found, on_panic, post,
    prepend, register,
};
use http::StatusCode;

#[tokio::main]
async fn main() -> Result<(), chainmux::Error> {
    tracing_subscriber::fmt::init();

    let app = build([
        prepend(chain![middleware::Trace::new()]),
        compound([
            register("GET|HEAD", "/users/:id", chain![handler::from_fn(get_user)]),
            post("/users", chain![middleware::from_fn(require_token), handler::from_fn(create_user)]),
            delete("/users/:id", chain![middleware::from_fn(require_token), handler::from_fn(delete_user)]),
        ]),
        get("/boom", chain![handler::from_fn(boom)]),
        not_found(handler::from_fn(|req: Request| async move {
            (StatusCode::NOT_FOUND, format!("nothing at {}", req.path()))
        })),
        on_panic(|_req, _fault| Response::status(StatusCode::INTERNAL_SERVER_ERROR)),
    ])?;

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

// Short-circuits with 401 unless an authorization header is present.
async fn require_token(req: Request, next: Next) -> Response {
    if req.header("authorization").is_none() {
        return Response::status(StatusCode::UNAUTHORIZED);
    }
    next.run(req).await
}

// GET /users/:id
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /users/:id → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn boom(_req: Request) -> Response {
    panic!("boom")
}
