// ABOUTME: App orchestrator — wires together session, agent loop, and TUI event loop.
// ABOUTME: Owns the terminal lifecycle and applies agent events to display state.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::{Mutex, mpsc};

use crate::agent::{AgentLoopParams, GroqAgentFactory, run_agent_loop};
use crate::config::Config;
use crate::session::{ChatSession, Role};
use crate::tools::Toolbox;
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::{AgentEvent, ChatMessageKind, Mode, ToolCallStatus, TuiState, UserEvent};
use crate::tui::{Tui, ui};

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    api_key: Option<String>,
}

impl App {
    /// Create a new app with the given configuration and any ambient API key
    /// (from the environment or CLI).
    pub fn new(config: Config, api_key: Option<String>) -> Self {
        Self {
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Run the application: spawn the agent loop, then drive the TUI until quit.
    pub async fn run(self) -> anyhow::Result<()> {
        let session = Arc::new(Mutex::new(ChatSession::new()));

        // Built once here only to show the toolset in the status bar; each
        // turn's agent constructs its own.
        let tool_count = Toolbox::builtin(&self.config.tools)?.len();

        let factory = Arc::new(GroqAgentFactory::new(self.config.clone()));

        // Create channels for agent <-> TUI communication.
        let (user_tx, user_rx) = mpsc::channel::<UserEvent>(16);
        let (agent_tx, mut agent_rx) = mpsc::channel::<AgentEvent>(64);

        // Spawn the agent loop in a background task.
        let agent_handle = tokio::spawn(run_agent_loop(
            AgentLoopParams {
                factory,
                session: session.clone(),
                api_key: self.api_key.clone(),
            },
            user_rx,
            agent_tx,
        ));

        let mut state = TuiState::new(
            self.config.llm.model.clone(),
            tool_count,
            self.api_key.is_none(),
        );

        // Seed the display from the session transcript (the greeting).
        for msg in session.lock().await.messages() {
            let kind = match msg.role {
                Role::User => ChatMessageKind::User,
                Role::Assistant => ChatMessageKind::Assistant,
            };
            state.push_message(kind, msg.content.clone());
        }

        let mut tui = Tui::new()?;
        let mut terminal_events = EventStream::new();

        let result = 'event_loop: loop {
            if let Err(e) = tui
                .terminal_mut()
                .draw(|frame| ui::render(frame, &mut state))
            {
                break 'event_loop Err(e.into());
            }

            tokio::select! {
                Some(event) = agent_rx.recv() => {
                    if let Some(follow_up) = apply_agent_event(&mut state, event) {
                        let _ = user_tx.send(UserEvent::Message(follow_up)).await;
                    }
                }
                Some(Ok(event)) = terminal_events.next() => {
                    let Event::Key(key) = event else { continue };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match handle_key(&mut state, key) {
                        InputResult::Send(text) => {
                            state.push_message(ChatMessageKind::User, text.clone());
                            state.streaming = true;
                            let _ = user_tx.send(UserEvent::Message(text)).await;
                        }
                        InputResult::SubmitKey(key_text) => {
                            let _ = user_tx.send(UserEvent::ApiKey(key_text)).await;
                            state.push_message(
                                ChatMessageKind::System,
                                "API key set — ask me anything.".to_string(),
                            );
                        }
                        InputResult::Quit => break 'event_loop Ok(()),
                        InputResult::None => {}
                    }
                }
            }
        };

        tui.restore()?;

        // Signal agent loop to quit and wait for it.
        let _ = user_tx.send(UserEvent::Quit).await;
        drop(user_tx);
        let _ = agent_handle.await;

        if result.is_ok() {
            print_exit_screen(&state, &*session.lock().await);
        }

        result
    }
}

/// Print a farewell line after the TUI exits.
fn print_exit_screen(state: &TuiState, session: &ChatSession) {
    let elapsed_secs = state.session_start.elapsed().as_secs();
    let elapsed = if elapsed_secs >= 3600 {
        format!("{}h {:02}m", elapsed_secs / 3600, (elapsed_secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", elapsed_secs / 60, elapsed_secs % 60)
    };

    println!();
    println!("  🔎 Thanks for using scout!");
    println!(
        "  🕐 Session lasted {elapsed} with {} messages exchanged.",
        session.len()
    );
    println!();
}

/// Apply one agent event to the display state. Returns a queued follow-up
/// message that should be sent to the agent loop, if the finished turn
/// unblocked one.
pub fn apply_agent_event(state: &mut TuiState, event: AgentEvent) -> Option<String> {
    match event {
        AgentEvent::TextDelta(text) => {
            state.append_to_last_assistant(&text);
        }
        AgentEvent::TextDone => {}
        AgentEvent::ToolCallStarted {
            tool_name,
            params_summary,
        } => {
            state.push_message(
                ChatMessageKind::ToolCall {
                    tool_name,
                    status: ToolCallStatus::Running,
                },
                params_summary,
            );
        }
        AgentEvent::ToolResult {
            tool_name,
            content,
            is_error,
        } => {
            let status = if is_error {
                ToolCallStatus::Failed
            } else {
                ToolCallStatus::Done
            };
            state.update_tool_status(&tool_name, status);
            state.push_message(ChatMessageKind::ToolResult { is_error }, content);
        }
        AgentEvent::Usage {
            prompt_tokens,
            completion_tokens,
        } => {
            state.total_tokens += (prompt_tokens + completion_tokens) as u64;
        }
        AgentEvent::Reply { content, .. } => {
            state.finish_assistant(content);
        }
        AgentEvent::KeyRequired => {
            state.mode = Mode::ApiKeyEntry;
            state.push_message(
                ChatMessageKind::System,
                "An API key is required before asking questions.".to_string(),
            );
        }
        AgentEvent::Done => {
            state.streaming = false;
            if let Some(queued) = state.queued_message.take() {
                state.push_message(ChatMessageKind::User, queued.clone());
                state.streaming = true;
                return Some(queued);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_state() -> TuiState {
        TuiState::new("test-model".to_string(), 3, false)
    }

    #[test]
    fn text_delta_appends_to_assistant() {
        let mut state = chat_state();
        apply_agent_event(&mut state, AgentEvent::TextDelta("Hello".to_string()));
        apply_agent_event(&mut state, AgentEvent::TextDelta(" world".to_string()));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "Hello world");
    }

    #[test]
    fn reply_settles_streamed_message() {
        let mut state = chat_state();
        apply_agent_event(&mut state, AgentEvent::TextDelta("partial".to_string()));
        apply_agent_event(
            &mut state,
            AgentEvent::Reply {
                content: "Full answer.".to_string(),
                is_error: false,
            },
        );
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "Full answer.");
    }

    #[test]
    fn error_reply_becomes_assistant_message() {
        let mut state = chat_state();
        state.push_message(ChatMessageKind::User, "q".to_string());
        apply_agent_event(
            &mut state,
            AgentEvent::Reply {
                content: "❌ Error: boom".to_string(),
                is_error: true,
            },
        );
        let last = state.messages.last().unwrap();
        assert_eq!(last.kind, ChatMessageKind::Assistant);
        assert_eq!(last.content, "❌ Error: boom");
    }

    #[test]
    fn tool_events_track_status() {
        let mut state = chat_state();
        apply_agent_event(
            &mut state,
            AgentEvent::ToolCallStarted {
                tool_name: "arxiv".to_string(),
                params_summary: r#"{"query":"transformers"}"#.to_string(),
            },
        );
        assert_eq!(
            state.messages[0].kind,
            ChatMessageKind::ToolCall {
                tool_name: "arxiv".to_string(),
                status: ToolCallStatus::Running,
            }
        );

        apply_agent_event(
            &mut state,
            AgentEvent::ToolResult {
                tool_name: "arxiv".to_string(),
                content: "Title: ...".to_string(),
                is_error: false,
            },
        );
        assert_eq!(
            state.messages[0].kind,
            ChatMessageKind::ToolCall {
                tool_name: "arxiv".to_string(),
                status: ToolCallStatus::Done,
            }
        );
        assert_eq!(
            state.messages[1].kind,
            ChatMessageKind::ToolResult { is_error: false }
        );
    }

    #[test]
    fn failed_tool_marks_status() {
        let mut state = chat_state();
        apply_agent_event(
            &mut state,
            AgentEvent::ToolCallStarted {
                tool_name: "search".to_string(),
                params_summary: "{}".to_string(),
            },
        );
        apply_agent_event(
            &mut state,
            AgentEvent::ToolResult {
                tool_name: "search".to_string(),
                content: "connection refused".to_string(),
                is_error: true,
            },
        );
        assert_eq!(
            state.messages[0].kind,
            ChatMessageKind::ToolCall {
                tool_name: "search".to_string(),
                status: ToolCallStatus::Failed,
            }
        );
    }

    #[test]
    fn usage_accumulates_tokens() {
        let mut state = chat_state();
        apply_agent_event(
            &mut state,
            AgentEvent::Usage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
        );
        apply_agent_event(
            &mut state,
            AgentEvent::Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        );
        assert_eq!(state.total_tokens, 165);
    }

    #[test]
    fn done_stops_streaming() {
        let mut state = chat_state();
        state.streaming = true;
        let follow_up = apply_agent_event(&mut state, AgentEvent::Done);
        assert!(follow_up.is_none());
        assert!(!state.streaming);
    }

    #[test]
    fn done_flushes_queued_message() {
        let mut state = chat_state();
        state.streaming = true;
        state.queued_message = Some("follow up".to_string());

        let follow_up = apply_agent_event(&mut state, AgentEvent::Done);

        assert_eq!(follow_up, Some("follow up".to_string()));
        assert!(state.streaming); // re-set for the queued send
        assert!(state.queued_message.is_none());
        let last = state.messages.last().unwrap();
        assert_eq!(last.kind, ChatMessageKind::User);
        assert_eq!(last.content, "follow up");
    }

    #[test]
    fn key_required_gates_interaction() {
        let mut state = chat_state();
        apply_agent_event(&mut state, AgentEvent::KeyRequired);
        assert_eq!(state.mode, Mode::ApiKeyEntry);
        let last = state.messages.last().unwrap();
        assert_eq!(last.kind, ChatMessageKind::System);
        assert!(last.content.contains("API key"));
    }
}
