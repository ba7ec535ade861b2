//! Dining Table - conductor-arbitrated dining philosophers
//!
//! This crate runs the dining philosophers problem on `ractor` actors:
//! a single conductor owns the tick scheduler and arbitrates every fork
//! request, while each philosopher is a small state machine that only
//! advances when ticked.

pub mod actors;
pub mod config;
pub mod table;

pub use config::SimulationConfig;
pub use table::{run_simulation, shutdown, spawn_table, TableError, TableHandle};
