pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;
pub mod logging;
pub mod models;
pub mod staleness;
pub mod sweep;

pub use error::{Result, SweepError};
