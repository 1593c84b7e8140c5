pub mod chat;
pub mod frontend;
pub mod settings;

pub use frontend::start_server;
