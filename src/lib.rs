//! Explain code snippets with an LLM and run them on a hosted execution service.

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod explain;
pub mod handlers;
pub mod language;
pub mod llm;
pub mod logging;
pub mod orchestrator;
pub mod printer;
pub mod prompt;
pub mod server;
pub mod tui;
