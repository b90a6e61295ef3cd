//! Chat messages
//!
//! [`Message`] serializes as a chat-completions message object, so it is
//! sent to the runtime as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(Message::user("Analyze AAPL")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "Analyze AAPL" }));
    }

    #[test]
    fn test_parse_assistant_message() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"Revenue grew."}"#).unwrap();
        assert_eq!(msg, Message::assistant("Revenue grew."));
    }
}
