// Seeds an in memory vote store with an item and votes from other users.

use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, ItemId, UserId};
use crate::shared::infrastructure::persistence_gateway::PersistenceGateway;
use crate::shared::infrastructure::persistence_gateway::in_memory::InMemoryVoteRecords;

pub async fn seeded_backend(
    model: CountingModel,
    item_id: &str,
    up_votes: usize,
    down_votes: usize,
) -> InMemoryVoteRecords {
    let backend = InMemoryVoteRecords::new(model);
    seed(&backend, item_id, up_votes, down_votes).await;
    backend
}

pub async fn seed(backend: &InMemoryVoteRecords, item_id: &str, up_votes: usize, down_votes: usize) {
    let item_id = ItemId::new(item_id);
    backend.register_item(item_id.clone()).await;
    let voters = (0..up_votes)
        .map(|n| (format!("up-voter-{n}"), Direction::Up))
        .chain((0..down_votes).map(|n| (format!("down-voter-{n}"), Direction::Down)));
    for (voter, direction) in voters {
        backend
            .set_vote(&item_id, &UserId::new(voter), direction)
            .await
            .unwrap();
    }
}
