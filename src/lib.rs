pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod models;

pub use error::{Result, WorktreeError};
