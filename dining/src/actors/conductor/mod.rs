//! ConductorActor - arbitrates every fork at the table
//!
//! The ConductorActor is the single coordinating component that:
//! - Receives the table topology via `ConductorMsg::Go`
//! - Ticks one randomly chosen philosopher per round
//! - Grants or denies `GrabLeftFork` / `GrabRightFork` requests
//! - Tracks `busy_forks` and releases pairs on `DoneEating`
//! - Aborts the whole table if two neighbors ever claim the same fork
//!
//! ## Round
//!
//! ```text
//! check invariants -> tick philosopher -> drain requests -> tick_count += 1
//!        ^                                                       |
//!        +-------------------------------------------------------+
//! ```
//!
//! A round is closed only when every message the tick caused has been
//! handled: each tick and fork reply is a rendezvous whose acknowledgement
//! says how many requests the philosopher sent back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dining::table::spawn_table;
//!
//! let table = spawn_table(&config).await?;
//! let report = table.start().await?.wait().await?;
//! ```

pub mod actor;
pub mod arbiter;
pub mod invariants;
pub mod protocol;
pub mod state;

#[cfg(test)]
mod tests;

pub use actor::{ConductorActor, ConductorArguments, ConductorState};
pub use arbiter::{ForkArbiter, RingArbiter};
pub use invariants::InvariantViolation;
pub use protocol::{ConductorError, ConductorMsg};
