mod api;
mod conversation;
mod reveal;
mod session;
mod state;

pub use api::{ApiError, ReplyClient, DEFAULT_ENDPOINT};
pub use conversation::{Conversation, Message, Sender};
pub use reveal::{RevealEvent, RevealScheduler, DEFAULT_INTERVAL};
pub use session::{ChatSession, ChatStore};
pub use state::{ChatState, API_ERROR_TEXT};
