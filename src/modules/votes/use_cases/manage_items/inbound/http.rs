use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::shared::core::primitives::ItemId;
use crate::shell::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    let item_id = ItemId::new(item_id);
    if state.votes.register_item(item_id.clone()).await {
        info!(item_id = %item_id, "votable item registered");
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    let item_id = ItemId::new(item_id);
    if state.votes.delete_item(&item_id).await {
        info!(item_id = %item_id, "votable item deleted");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
