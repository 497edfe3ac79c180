use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use crate::shell::http::gateway_error_status;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct SetVoteBody {
    pub user_id: String,
    pub direction: Direction,
}

#[derive(Serialize)]
pub struct SetVoteResponse {
    pub count: Option<u64>,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    body: Result<Json<SetVoteBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let item_id = ItemId::new(item_id);
    let user_id = UserId::new(body.user_id);

    match state.votes.set_vote(&item_id, &user_id, body.direction).await {
        Ok(outcome) => Json(SetVoteResponse {
            count: outcome.count,
        })
        .into_response(),
        Err(error) => {
            debug!(item_id = %item_id, error = %error, "set_vote refused");
            gateway_error_status(&error).into_response()
        }
    }
}
