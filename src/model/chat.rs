use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Ask me anything about your workplan, and I'll \
help refine workstreams, milestones, or tasks.";

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: String,
    pub text: String,
}

/// The conversation transcript, seeded with the assistant greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatLog {
    fn default() -> Self {
        let mut log = ChatLog {
            messages: Vec::new(),
            next_id: 1,
        };
        log.push("assistant", GREETING);
        log
    }
}

impl ChatLog {
    pub fn push(&mut self, role: &str, text: &str) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role: role.to_string(),
            text: text.to_string(),
        });
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
