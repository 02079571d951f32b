//! Purchase Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/purchase-orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/lines", put(handler::update_lines))
        .route("/{id}/transition", post(handler::transition))
        .route(
            "/{id}/receipts",
            get(handler::list_receipts).post(handler::record_receipt),
        )
        .route(
            "/{id}/invoices",
            get(handler::list_invoices).post(handler::record_invoice),
        )
}
