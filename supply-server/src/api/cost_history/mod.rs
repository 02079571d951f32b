//! Cost History API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cost-history", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::record))
        .route("/{item_id}", get(handler::history))
}
