//! Highway Traffic Simulation Library
//!
//! A single-lane car-following simulation with crashes and random spawning,
//! driven one fixed time step at a time.

pub mod simulation;
