//! Table host for Hearts matches: the AI turn scheduler, the match service
//! and the configuration and logging used by the `hearts-table` binary.

pub mod config;
pub mod deck;
pub mod logging;
pub mod scheduler;
pub mod service;

pub use scheduler::{BatchLimit, Halt, Progress};
pub use service::{ErrorResponse, MatchService, PlayResponse};
