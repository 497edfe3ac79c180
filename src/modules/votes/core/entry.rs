// Cached vote state for one item, and the copy handed to subscribers.
//
// Boundaries
// - Only the VoteStore creates or replaces a CacheEntry.
// - Views only ever see a VoteSnapshot, never the entry itself.

use crate::shared::core::primitives::{Direction, ItemId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub item_id: ItemId,
    pub count: u64,
    pub direction: Direction,
    pub version: u64,
}

impl CacheEntry {
    pub fn snapshot(&self) -> VoteSnapshot {
        VoteSnapshot {
            count: self.count,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSnapshot {
    pub count: u64,
    pub direction: Direction,
}

impl VoteSnapshot {
    pub fn new(count: u64, direction: Direction) -> Self {
        Self { count, direction }
    }
}
