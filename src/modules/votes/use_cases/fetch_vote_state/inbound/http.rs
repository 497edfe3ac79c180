use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::shared::core::primitives::{ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use crate::shell::http::gateway_error_status;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct FetchVoteStateParams {
    pub user_id: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(params): Query<FetchVoteStateParams>,
) -> impl IntoResponse {
    let item_id = ItemId::new(item_id);
    let viewer = params.user_id.map(UserId::new);

    match state.votes.fetch_vote_state(&item_id, viewer.as_ref()).await {
        Ok(vote_state) => Json(vote_state).into_response(),
        Err(error) => gateway_error_status(&error).into_response(),
    }
}
