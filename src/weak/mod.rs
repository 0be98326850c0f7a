//! Weak-type resolution
//!
//! Table-driven state machine converting raw direction classes into
//! resolved strong and number classes, one same-level run at a time.

pub mod machine;
pub mod tables;

pub use machine::{RunOutcome, WeakSeed, WeakTypeStateMachine};
pub use tables::{WeakAction, WeakInput, WeakState};
