//! Service example
//!
//! Runs a small axum server with trace tokens, default headers and one
//! request summary per request written to stdout.
//!
//! Run with: cargo run --example service
//! Then: curl -H 'Authorization: Bearer secret' localhost:3000/users/7?verbose=1

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Router};
use rust_service_logger::prelude::*;
use rust_service_logger::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let logger = configure(
        LoggerConfig::new(env!("CARGO_PKG_VERSION"), "rust_service_logger", "demo")
            .with_scm_link_template("https://github.com/kcenon/rust_service_logger"),
    );
    let _guard = logger.flush_guard();

    let app = Router::new()
        .route("/users/{id}", get(get_user))
        .layer(Extension(Arc::clone(&logger)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceTokenLayer)
                .layer(RequestLoggingLayer::new(Arc::clone(&logger)))
                .layer(DefaultHeadersLayer),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    logger.info("", format!("listening on {}", listener.local_addr()?));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

async fn get_user(
    Path(id): Path<u64>,
    Extension(token): Extension<TraceToken>,
    Extension(logger): Extension<Arc<Logger>>,
) -> (StatusCode, String) {
    if id == 0 {
        warn!(logger, token.as_str(), "rejected user id {}", id);
        return (StatusCode::BAD_REQUEST, r#"{"error":"invalid id"}"#.to_string());
    }

    info!(logger, token.as_str(), "loading user {}", id);
    (StatusCode::OK, format!(r#"{{"id":{}}}"#, id))
}
