// Server side record of one viewer's vote on one item.
//
// Responsibilities
// - Carry the identifiers and the direction; uniqueness per (item_id, user_id) is enforced by the store.
// - voted_at uses epoch milliseconds.

use crate::shared::core::primitives::{Direction, ItemId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VoteRecord {
    pub item_id: ItemId,
    pub user_id: UserId,
    pub direction: Direction,
    pub voted_at: i64,
}
