//! In-memory chat transcript.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use aarogya_types::{Language, NonEmptyText};

use crate::assistant::{Assistant, AssistantReply};
use crate::intent::Intent;
use crate::CoreResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub language: Language,
    /// Intent the reply answered. Only set on bot replies to a user turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

impl ChatMessage {
    fn new(text: impl Into<String>, sender: Sender, language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            language,
            intent: None,
        }
    }
}

/// A single conversation. Nothing is persisted; dropping the session discards it.
#[derive(Debug)]
pub struct ChatSession {
    assistant: Assistant,
    language: Language,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a conversation that opens with the greeting for `language`.
    pub fn start(assistant: Assistant, language: Language) -> CoreResult<Self> {
        let greeting = assistant.greet(language)?;
        Ok(Self {
            assistant,
            language,
            messages: vec![ChatMessage::new(greeting, Sender::Bot, language)],
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the reply language for later turns. Earlier messages are left as they were.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record a user turn and the assistant's answer. Blank input is ignored.
    pub fn send(&mut self, text: &str) -> CoreResult<Option<AssistantReply>> {
        let Ok(text) = NonEmptyText::new(text) else {
            return Ok(None);
        };

        let reply = self.assistant.respond(text.as_str(), self.language)?;
        self.messages
            .push(ChatMessage::new(text.into_inner(), Sender::User, self.language));
        self.messages
            .push(ChatMessage {
                intent: Some(reply.intent),
                ..ChatMessage::new(reply.text.clone(), Sender::Bot, self.language)
            });
        Ok(Some(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarogya_catalog::Catalog;
    use std::sync::Arc;

    fn session(language: Language) -> ChatSession {
        let assistant = Assistant::new(Arc::new(Catalog::bundled().unwrap()));
        ChatSession::start(assistant, language).unwrap()
    }

    #[test]
    fn test_session_opens_with_greeting() {
        let chat = session(Language::Hindi);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Bot);
        assert!(chat.messages()[0].text.starts_with("नमस्ते"));
    }

    #[test]
    fn test_send_records_both_turns() {
        let mut chat = session(Language::English);
        let reply = chat.send("  I feel tired  ").unwrap().expect("reply expected");

        assert_eq!(reply.intent, crate::Intent::SymptomCheck);
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "I feel tired");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].text, reply.text);
        assert_eq!(messages[2].intent, Some(crate::Intent::SymptomCheck));
        assert_eq!(messages[1].intent, None);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut chat = session(Language::English);
        assert!(chat.send("   ").unwrap().is_none());
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_language_switch_applies_to_next_reply() {
        let mut chat = session(Language::English);
        chat.set_language(Language::Odia);
        chat.send("vaccine").unwrap();

        let last = chat.messages().last().unwrap();
        assert_eq!(last.language, Language::Odia);
        assert!(last.text.starts_with("ମୁଁ ଟିକାକରଣ"));
    }
}
