// ABOUTME: Library root for the tux agent binary
// ABOUTME: Exposes config, startup wiring, built-in cogs and the console for main and tests

pub mod app;
pub mod cli;
pub mod cogs;
pub mod config;
pub mod console;
pub mod logging;
pub mod paths;
