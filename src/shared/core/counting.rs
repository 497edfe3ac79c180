// Counting models that turn a direction change into a tally delta.
//
// Purpose
// - Posts use an upvote-only tally; comments use a signed up/down score.
// - The model is picked by whoever wires a call site, never by inspecting the item.
//
// Boundaries
// - Pure arithmetic. No input or output.

use crate::shared::core::primitives::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountingModel {
    /// Only `up` is meaningful: `none <-> up` moves the tally by one.
    Single,
    /// `up` counts +1 and `down` counts -1.
    #[default]
    Signed,
}

impl CountingModel {
    pub fn supports(&self, direction: Direction) -> bool {
        !matches!((self, direction), (CountingModel::Single, Direction::Down))
    }

    fn weight(&self, direction: Direction) -> i64 {
        match (self, direction) {
            (_, Direction::None) => 0,
            (_, Direction::Up) => 1,
            (CountingModel::Single, Direction::Down) => 0,
            (CountingModel::Signed, Direction::Down) => -1,
        }
    }

    /// Change in the tally when a viewer's vote moves from `from` to `to`.
    pub fn delta(&self, from: Direction, to: Direction) -> i64 {
        self.weight(to) - self.weight(from)
    }

    /// Tally over a set of directions, clamped so it never drops below zero.
    pub fn tally<I>(&self, directions: I) -> u64
    where
        I: IntoIterator<Item = Direction>,
    {
        let sum: i64 = directions.into_iter().map(|d| self.weight(d)).sum();
        sum.max(0) as u64
    }

    /// Apply a delta to a count without ever going below zero.
    pub fn shift(count: u64, delta: i64) -> u64 {
        count.saturating_add_signed(delta)
    }
}

impl fmt::Display for CountingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountingModel::Single => f.write_str("single"),
            CountingModel::Signed => f.write_str("signed"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown counting model: {0}")]
pub struct UnknownCountingModel(pub String);

impl FromStr for CountingModel {
    type Err = UnknownCountingModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" | "upvote" | "upvote-only" => Ok(CountingModel::Single),
            "signed" | "updown" | "up-down" => Ok(CountingModel::Signed),
            other => Err(UnknownCountingModel(other.to_string())),
        }
    }
}
