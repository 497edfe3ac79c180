// Pure decision function for a toggle.
//
// Responsibilities
// - Requesting the direction already held withdraws the vote; anything else switches to it.
// - Compute the tally delta under the caller's counting model and the resulting count.
// - Never perform input or output.

use crate::modules::votes::core::entry::VoteSnapshot;
use crate::modules::votes::use_cases::toggle_vote::decision::{DecideError, Decision, Transition};
use crate::shared::core::counting::CountingModel;
use crate::shared::core::primitives::{Direction, Vote};

pub fn decide_toggle(model: CountingModel, current: &VoteSnapshot, requested: Vote) -> Decision {
    let requested_direction = Direction::from(requested);
    if !model.supports(requested_direction) {
        return Decision::Rejected {
            reason: DecideError::UnsupportedDirection { model, requested },
        };
    }

    let next_direction = if current.direction == requested_direction {
        Direction::None
    } else {
        requested_direction
    };
    let delta = model.delta(current.direction, next_direction);

    Decision::Accepted {
        transition: Transition {
            next_direction,
            next_count: CountingModel::shift(current.count, delta),
            delta,
        },
    }
}
