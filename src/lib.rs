pub mod config;
pub mod demand;
pub mod error;
pub mod policy;
pub mod render;
pub mod shelf;
pub mod solver;
pub mod types;
