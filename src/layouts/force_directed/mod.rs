mod forces;
mod simulation;

pub use forces::{Body, CategoryAttraction, Center, Collide, Force, ManyBody};
pub use simulation::{Simulation, SimulationState, Star};
