//! PhilosopherActor - a seat at the conductor's table
//!
//! ## State Machine
//!
//! ```text
//! Thinking --tick--> Hungry --ok--> HungryLeftFork --ok--> Eating
//!    ^                 |  ^             |  ^                  |
//!    |             deny|  |tick     deny|  |tick              |
//!    |                 v  |             v  |                  |
//!    |               (wait)           (wait)                  |
//!    +-------------------- tick / done_eating ----------------+
//! ```
//!
//! A philosopher never releases a fork before it has eaten, and retries a
//! denied request on every tick it receives.

pub mod actor;
pub mod protocol;
pub mod state;

#[cfg(test)]
mod tests;

pub use actor::{PhilosopherActor, PhilosopherArguments, PhilosopherState};
pub use protocol::{ConductorPort, PhilosopherError, PhilosopherMsg};
pub use state::{SeatRequest, SeatState};
