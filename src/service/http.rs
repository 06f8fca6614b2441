//! HTTP transport: maps REST routes and generic command calls onto
//! `Service::dispatch`.
//!
//! Requires the `http` feature. Request headers become the `Session`;
//! path parameters are merged into the JSON input.
//!
//! ## Routes
//!
//! - `GET /health`
//! - `POST /commands/:command` dispatches any registered command
//! - `POST /register`
//! - `POST /books/:book_id`, `GET /books/:book_id`, `GET /books/:book_id/reviews`
//! - `GET | PUT | DELETE /profile`
//! - `GET /p/:handle/{profile,books,readlist,reviews,activity}`
//! - `GET /friends/books`

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;

use super::error::HandlerError;
use super::service::Service;
use super::session::Session;

type Shared<R> = State<Arc<Service<R>>>;
type Body = Result<Json<Value>, JsonRejection>;

pub fn router<R: Send + Sync + 'static>(service: Arc<Service<R>>) -> Router {
    Router::new()
        .route("/health", get(health::<R>))
        .route("/commands/:command", post(command::<R>))
        .route("/register", post(register::<R>))
        .route("/books/:book_id", post(apply_action::<R>).get(book_state::<R>))
        .route("/books/:book_id/reviews", get(book_reviews::<R>))
        .route(
            "/profile",
            get(profile_get::<R>)
                .put(profile_update::<R>)
                .delete(profile_delete::<R>),
        )
        .route("/p/:handle/:page", get(public_page::<R>))
        .route("/friends/books", get(friends_books::<R>))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(service)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve<R: Send + Sync + 'static>(
    service: Arc<Service<R>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}

/// Insert path parameters into the body object. A non-object body is
/// replaced.
fn merge(body: Value, params: &[(&str, &str)]) -> Value {
    let mut object = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in params {
        object.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    Value::Object(object)
}

fn respond(result: Result<Value, HandlerError>, success: StatusCode) -> Response {
    match result {
        Ok(value) => (success, Json(value)).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// Unwrap a JSON body. A rejected body (bad syntax, wrong content type)
/// becomes a 400 with the usual `{ "error": ... }` envelope.
fn body(payload: Body) -> Result<Value, Response> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        respond(
            Err(HandlerError::DecodeFailed(rejection.body_text())),
            StatusCode::OK,
        )
    })
}

fn run<R: Send + Sync + 'static>(
    service: &Service<R>,
    command: &str,
    input: Value,
    headers: &HeaderMap,
) -> Response {
    respond(
        service.dispatch(command, input, session_from_headers(headers)),
        StatusCode::OK,
    )
}

async fn health<R: Send + Sync + 'static>(State(service): Shared<R>) -> impl IntoResponse {
    Json(json!({ "ok": true, "commands": service.commands() }))
}

async fn command<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    Path(command): Path<String>,
    headers: HeaderMap,
    payload: Body,
) -> Response {
    match body(payload) {
        Ok(input) => run(&service, &command, input, &headers),
        Err(response) => response,
    }
}

async fn register<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    headers: HeaderMap,
    payload: Body,
) -> Response {
    let input = match body(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let session = session_from_headers(&headers);
    respond(
        service.dispatch("user.register", input, session),
        StatusCode::CREATED,
    )
}

async fn apply_action<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
    payload: Body,
) -> Response {
    match body(payload) {
        Ok(value) => {
            let input = merge(value, &[("bookId", book_id.as_str())]);
            run(&service, "book.apply", input, &headers)
        }
        Err(response) => response,
    }
}

async fn book_state<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let input = merge(Value::Null, &[("bookId", book_id.as_str())]);
    run(&service, "book.state", input, &headers)
}

async fn book_reviews<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let input = merge(Value::Null, &[("bookId", book_id.as_str())]);
    run(&service, "book.reviews", input, &headers)
}

async fn profile_get<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    headers: HeaderMap,
) -> Response {
    run(&service, "profile.get", json!({}), &headers)
}

async fn profile_update<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    headers: HeaderMap,
    payload: Body,
) -> Response {
    match body(payload) {
        Ok(input) => run(&service, "profile.update", input, &headers),
        Err(response) => response,
    }
}

async fn profile_delete<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    headers: HeaderMap,
) -> Response {
    run(&service, "profile.delete", json!({}), &headers)
}

async fn public_page<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    Path((handle, page)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let command = match page.as_str() {
        "profile" => "public.profile",
        "books" => "public.books",
        "readlist" => "public.readlist",
        "reviews" => "public.reviews",
        "activity" => "public.activity",
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let input = merge(Value::Null, &[("handle", handle.as_str())]);
    run(&service, command, input, &headers)
}

async fn friends_books<R: Send + Sync + 'static>(
    State(service): Shared<R>,
    headers: HeaderMap,
) -> Response {
    run(&service, "friends.books", json!({}), &headers)
}
