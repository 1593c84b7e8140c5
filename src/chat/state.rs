use super::conversation::{Conversation, Message};
use super::reveal::RevealEvent;

pub const API_ERROR_TEXT: &str = "Error getting response from API";

/// Everything the chat component renders.
#[derive(Debug, Default)]
pub struct ChatState {
    conversation: Conversation,
    busy: bool,
    typing: Option<String>,
    active_cycle: Option<u64>,
}

impl ChatState {
    pub fn new() -> ChatState {
        ChatState::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The partially revealed reply, if a reveal is in progress.
    pub fn typing(&self) -> Option<&str> {
        self.typing.as_deref()
    }

    /// Records the user's turn and marks the state busy. Returns the text to
    /// send, or `None` when it is blank and nothing should happen.
    pub fn begin_turn(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        self.conversation.append(Message::user(text));
        self.busy = true;
        Some(text.to_string())
    }

    pub fn fail_turn(&mut self) {
        self.conversation.append(Message::bot(API_ERROR_TEXT));
    }

    pub fn end_turn(&mut self) {
        self.busy = false;
    }

    pub fn apply(&mut self, event: RevealEvent) {
        match event {
            RevealEvent::Started { cycle } => {
                if self.is_stale(cycle) {
                    return;
                }
                self.active_cycle = Some(cycle);
                self.typing = Some(String::new());
            }
            RevealEvent::Progress { cycle, shown } => {
                if self.is_stale(cycle) {
                    return;
                }
                self.active_cycle = Some(cycle);
                self.typing = Some(shown);
            }
            RevealEvent::Committed { cycle, text } => {
                self.conversation.append(Message::bot(text));
                if self.active_cycle == Some(cycle) {
                    self.active_cycle = None;
                    self.typing = None;
                }
            }
        }
    }

    fn is_stale(&self, cycle: u64) -> bool {
        self.active_cycle.map_or(false, |active| cycle < active)
    }
}
