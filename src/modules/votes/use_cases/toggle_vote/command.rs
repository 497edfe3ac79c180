// Command for casting, switching or withdrawing a vote.
//
// - acting_user is None for anonymous viewers; the controller rejects those before touching anything.
// - Transport independent.

use crate::shared::core::primitives::{ItemId, UserId, Vote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleVote {
    pub item_id: ItemId,
    pub requested: Vote,
    pub acting_user: Option<UserId>,
}

impl ToggleVote {
    pub fn new(item_id: impl Into<ItemId>, requested: Vote, acting_user: Option<UserId>) -> Self {
        Self {
            item_id: item_id.into(),
            requested,
            acting_user,
        }
    }
}
