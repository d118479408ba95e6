//! Systems run by the engine each tick, in this order:
//! command processor, rewind state machine, clock sync, bubbles,
//! gameplay consumers, snapshot capture.
//!
//! Systems are functions over explicitly passed state. They do not own
//! state of their own beyond the records handed to them.

pub mod bubbles;
pub mod clock;
pub mod command_processor;
pub mod diagnostics;
pub mod movement;
pub mod rewind;
pub mod snapshot;
