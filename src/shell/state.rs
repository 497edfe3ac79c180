use crate::shared::infrastructure::persistence_gateway::in_memory::InMemoryVoteRecords;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub votes: Arc<InMemoryVoteRecords>,
}

impl AppState {
    pub fn new(votes: Arc<InMemoryVoteRecords>) -> Self {
        Self { votes }
    }
}
