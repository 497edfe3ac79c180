use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, Vote};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("{requested} votes are not counted under the {model} model")]
    UnsupportedDirection { model: CountingModel, requested: Vote },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next_direction: Direction,
    pub next_count: u64,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted { transition: Transition },
    Rejected { reason: DecideError },
}
