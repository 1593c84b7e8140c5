mod app;
mod components;
mod server_liveview;

pub use app::app;
pub use server_liveview::start_server;
