#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One turn of the conversation. Never modified after it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: Sender,
    text: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Message {
        Message {
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Message {
        Message::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Message {
        Message::new(Sender::Bot, text)
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Conversation {
        Conversation::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_chronological_order() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("hello"));
        conversation.append(Message::bot("hi there"));
        conversation.append(Message::user("bye"));

        let texts: Vec<_> = conversation.iter().map(Message::text).collect();
        assert_eq!(texts, ["hello", "hi there", "bye"]);
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.last().map(Message::sender), Some(Sender::User));
    }

    #[test]
    fn new_conversation_is_empty() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert!(conversation.last().is_none());
    }
}
