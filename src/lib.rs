//! Schelling Self-Segregation Simulation Engine

pub mod core;
pub mod sim;
