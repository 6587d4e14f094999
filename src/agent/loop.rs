// ABOUTME: Chat session loop — one agent invocation per user turn, history append-only.
// ABOUTME: Absorbs every turn failure into a readable assistant message; never crashes the session.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::agent::react::AgentFactory;
use crate::session::ChatSession;
use crate::tui::state::{AgentEvent, UserEvent};

/// Bundled parameters for the agent loop.
pub struct AgentLoopParams {
    pub factory: Arc<dyn AgentFactory>,
    /// The append-only transcript, shared with the caller by handle.
    pub session: Arc<Mutex<ChatSession>>,
    /// Key found in the environment at startup, if any. Can also arrive
    /// later via `UserEvent::ApiKey`.
    pub api_key: Option<String>,
}

/// Run the chat session loop, processing one user turn at a time.
///
/// This function runs until the user sends a Quit event or the channel
/// closes. Each turn constructs a fresh agent from the factory, invokes it
/// with ONLY the new user text (the displayed transcript is cumulative, but
/// the agent is stateless across turns), and appends exactly one assistant
/// message: the answer, or the error fallback.
pub async fn run_agent_loop(
    params: AgentLoopParams,
    mut user_rx: mpsc::Receiver<UserEvent>,
    agent_tx: mpsc::Sender<AgentEvent>,
) {
    let mut api_key = params.api_key.filter(|k| !k.trim().is_empty());

    loop {
        let event = match user_rx.recv().await {
            Some(e) => e,
            None => break, // Channel closed.
        };

        match event {
            UserEvent::Quit => break,
            UserEvent::ApiKey(key) => {
                let trimmed = key.trim();
                if !trimmed.is_empty() {
                    api_key = Some(trimmed.to_string());
                }
            }
            UserEvent::Message(text) => {
                // Gating condition, not an error: without a key no agent is
                // ever constructed and the transcript is left untouched.
                let Some(key) = api_key.as_deref() else {
                    let _ = agent_tx.send(AgentEvent::KeyRequired).await;
                    continue;
                };

                params.session.lock().await.push_user(&text);

                let (reply, is_error) =
                    match run_turn(params.factory.as_ref(), key, &text, &agent_tx).await {
                        Ok(answer) => (answer, false),
                        Err(e) => (format!("❌ Error: {}", e), true),
                    };

                params.session.lock().await.push_assistant(&reply);

                let _ = agent_tx
                    .send(AgentEvent::Reply {
                        content: reply,
                        is_error,
                    })
                    .await;
                let _ = agent_tx.send(AgentEvent::Done).await;
            }
        }
    }
}

/// Execute one turn: build a fresh agent and invoke it with the current
/// question only. Exactly one attempt — any failure surfaces as the Err.
async fn run_turn(
    factory: &dyn AgentFactory,
    api_key: &str,
    question: &str,
    events: &mpsc::Sender<AgentEvent>,
) -> anyhow::Result<String> {
    let agent = factory.build(api_key)?;
    agent.answer(question, events).await
}
