mod args;
mod commands;
mod repl;

pub use args::{AgentMode, CliArgs};
pub use repl::{AppState, run_repl};
