// ABOUTME: Conversation session — the append-only chat transcript for one run.
// ABOUTME: Seeded with a greeting; grows by exactly one user + one assistant message per turn.

/// The greeting shown as the first assistant message of every session.
pub const GREETING: &str = "Hi 👋, I'm a chatbot who can search the web. How can I help you?";

/// Who authored a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation. Immutable once appended.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The session transcript. Append-only: messages are never edited or
/// removed, and ordering is arrival order. Lives for exactly one interactive
/// session — nothing is persisted.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a new session seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Total message count, including the seed greeting.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true — the greeting is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed turns: (len - 1) / 2 once every user message has
    /// been answered.
    pub fn turn_count(&self) -> usize {
        (self.messages.len() - 1) / 2
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
