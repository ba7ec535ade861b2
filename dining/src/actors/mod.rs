pub mod conductor;
pub mod philosopher;

pub use conductor::{ConductorActor, ConductorArguments, ConductorError, ConductorMsg};
pub use philosopher::{
    ConductorPort, PhilosopherActor, PhilosopherArguments, PhilosopherError, PhilosopherMsg,
};
