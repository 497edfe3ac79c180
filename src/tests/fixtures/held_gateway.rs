// Wraps the in memory vote store and holds every write until the test releases it.

use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::in_memory::InMemoryVoteRecords;
use crate::shared::infrastructure::persistence_gateway::{
    GatewayError, PersistenceGateway, SetVoteOutcome, VoteState,
};
use tokio::sync::Semaphore;

pub struct HeldGateway {
    backend: InMemoryVoteRecords,
    writes: Semaphore,
}

impl HeldGateway {
    pub fn new(backend: InMemoryVoteRecords) -> Self {
        Self {
            backend,
            writes: Semaphore::new(0),
        }
    }

    pub fn backend(&self) -> &InMemoryVoteRecords {
        &self.backend
    }

    pub fn release_writes(&self, writes: usize) {
        self.writes.add_permits(writes);
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for HeldGateway {
    async fn set_vote(
        &self,
        item_id: &ItemId,
        user_id: &UserId,
        direction: Direction,
    ) -> Result<SetVoteOutcome, GatewayError> {
        let permit = self
            .writes
            .acquire()
            .await
            .map_err(|e| GatewayError::NetworkFailure(e.to_string()))?;
        permit.forget();
        self.backend.set_vote(item_id, user_id, direction).await
    }

    async fn fetch_vote_state(
        &self,
        item_id: &ItemId,
        user_id: Option<&UserId>,
    ) -> Result<VoteState, GatewayError> {
        self.backend.fetch_vote_state(item_id, user_id).await
    }
}
