pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod reporters;
pub mod store;
pub mod utils;
pub mod writers;

pub use error::{Result, SimulationError};
