pub mod direct;
pub mod dispatch;
pub mod loop_impl;
pub mod prompt;

pub use direct::run_direct_turn;
pub use loop_impl::{AgentAnswer, AgentConfig, AgentEvent, run_tool_turn};
pub use prompt::{FINAL_ANSWER_MARKER, extract_final_answer};
