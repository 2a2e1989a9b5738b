pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod links;
pub mod loader;
pub mod logging;
pub mod output;
pub mod shell;
pub mod store;

#[cfg(test)]
mod tests;
