use std::cell::RefCell;
use std::sync::Arc;

use tracing::{info, warn};

use super::api::ReplyClient;
use super::reveal::RevealScheduler;
use super::state::ChatState;

/// Somewhere the chat state lives. The component keeps it in a Dioxus
/// `UseRef`; tests use a plain `RefCell`.
pub trait ChatStore {
    fn with_chat<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R;
}

impl ChatStore for RefCell<ChatState> {
    fn with_chat<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut *self.borrow_mut())
    }
}

#[derive(Clone)]
pub struct ChatSession {
    client: ReplyClient,
    reveal: Arc<RevealScheduler>,
}

impl ChatSession {
    pub fn new(client: ReplyClient, reveal: RevealScheduler) -> ChatSession {
        ChatSession {
            client,
            reveal: Arc::new(reveal),
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_revealing()
    }

    /// Sends `text` and starts revealing the reply. Blank text is ignored and
    /// `false` is returned.
    pub async fn submit<S: ChatStore>(&self, store: &S, text: &str) -> bool {
        match store.with_chat(|state| state.begin_turn(text)) {
            Some(query) => {
                self.respond(store, &query).await;
                true
            }
            None => false,
        }
    }

    /// Second half of [`ChatSession::submit`], for callers that already
    /// recorded the user's turn with [`ChatState::begin_turn`].
    pub async fn respond<S: ChatStore>(&self, store: &S, query: &str) {
        match self.client.ask(query).await {
            Ok(reply) => {
                info!(chars = reply.chars().count(), "got reply");
                self.reveal.start(reply);
            }
            Err(err) => {
                warn!(%err, endpoint = self.client.endpoint(), "error fetching reply");
                store.with_chat(ChatState::fail_turn);
            }
        }
        // cleared once the reveal has started, not when it finishes
        store.with_chat(ChatState::end_turn);
    }
}
