// Port to the authoritative vote store.
//
// Purpose
// - Describe what the controller needs from the backing store without binding to a database or a transport.
//
// Responsibilities
// - set_vote: `Direction::None` deletes the viewer's record, anything else upserts it.
//   At most one record exists per (item, user). Directions the store does not count are refused.
// - fetch_vote_state: tally plus the viewer's own direction, used to hydrate the cache.
//
// Testing guidance
// - Use the in memory implementation; it can go offline, delay, or fail the next call.

use crate::shared::core::primitives::{Direction, ItemId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("not allowed to vote on item {item_id}")]
    Unauthorized { item_id: ItemId },

    #[error("stale write rejected for item {item_id}")]
    Conflict { item_id: ItemId },

    #[error("item {item_id} no longer exists")]
    NotFound { item_id: ItemId },

    #[error("{direction} votes are not counted on item {item_id}")]
    UnsupportedDirection { item_id: ItemId, direction: Direction },

    #[error("network failure: {0}")]
    NetworkFailure(String),
}

/// Result of a successful write. `count` is present when the store recomputed the tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVoteOutcome {
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub count: u64,
    pub direction: Direction,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn set_vote(
        &self,
        item_id: &ItemId,
        user_id: &UserId,
        direction: Direction,
    ) -> Result<SetVoteOutcome, GatewayError>;

    async fn fetch_vote_state(
        &self,
        item_id: &ItemId,
        user_id: Option<&UserId>,
    ) -> Result<VoteState, GatewayError>;
}

pub mod in_memory;
