//! CLI library components for the music collection manager.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
