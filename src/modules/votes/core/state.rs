// Per item controller state.
//
// - Idle: a toggle may start.
// - Pending: one persistence call is in flight; further toggles are rejected, not queued.
//
// There is no terminal state; an item's controller is reused for the whole session.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Pending,
}
