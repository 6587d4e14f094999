// ABOUTME: Agent module — per-turn agent factory and the chat session loop.
// ABOUTME: Dispatches tool calls and folds turn failures into the transcript.

pub mod r#loop;
pub mod react;

pub use r#loop::{AgentLoopParams, run_agent_loop};
pub use react::{AgentFactory, GroqAgentFactory, ReactAgent, TurnAgent};
