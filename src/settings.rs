use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::chat::{
    ChatSession, ReplyClient, RevealEvent, RevealScheduler, DEFAULT_ENDPOINT, DEFAULT_INTERVAL,
};

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3030";

lazy_static! {
    static ref SETTINGS: Settings = Settings::from_env().unwrap_or_else(|err| {
        warn!("invalid settings, using defaults: {err:#}");
        Settings::default()
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    /// host:port the browser connects the websocket to
    pub reachable_addr: String,
    pub reply_endpoint: String,
    pub typing_interval: Duration,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Settings> {
        dotenvy::dotenv().ok();
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let listen = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {listen:?}"))?;

        let reachable_addr = lookup("REACHABLE_ADDR").unwrap_or(listen);

        let reply_endpoint =
            lookup("REPLY_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        reqwest::Url::parse(&reply_endpoint)
            .with_context(|| format!("REPLY_ENDPOINT is not a URL: {reply_endpoint:?}"))?;

        let typing_interval = match lookup("TYPING_INTERVAL_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .with_context(|| format!("TYPING_INTERVAL_MS is not a number: {ms:?}"))?,
            ),
            None => DEFAULT_INTERVAL,
        };

        Ok(Settings {
            listen_addr,
            reachable_addr,
            reply_endpoint,
            typing_interval,
        })
    }

    /// Process-wide settings, read once on first use.
    pub fn global() -> &'static Settings {
        &SETTINGS
    }

    /// A chat session talking to the configured endpoint, reporting reveal
    /// progress on `events`.
    pub fn chat_session(&self, events: UnboundedSender<RevealEvent>) -> ChatSession {
        ChatSession::new(
            ReplyClient::new(self.reply_endpoint.clone()),
            RevealScheduler::new(events, self.typing_interval),
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            reachable_addr: DEFAULT_LISTEN_ADDR.to_string(),
            reply_endpoint: DEFAULT_ENDPOINT.to_string(),
            typing_interval: DEFAULT_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reachable_addr_follows_listen_addr() {
        let settings = settings_from(&[("LISTEN_ADDR", "0.0.0.0:8080")]).unwrap();
        assert_eq!(settings.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(settings.reachable_addr, "0.0.0.0:8080");

        let settings = settings_from(&[
            ("LISTEN_ADDR", "0.0.0.0:8080"),
            ("REACHABLE_ADDR", "chat.example.com:80"),
        ])
        .unwrap();
        assert_eq!(settings.reachable_addr, "chat.example.com:80");
    }

    #[test]
    fn overrides_endpoint_and_interval() {
        let settings = settings_from(&[
            ("REPLY_ENDPOINT", "http://10.0.0.2:9000/ask"),
            ("TYPING_INTERVAL_MS", "20"),
        ])
        .unwrap();
        assert_eq!(settings.reply_endpoint, "http://10.0.0.2:9000/ask");
        assert_eq!(settings.typing_interval, Duration::from_millis(20));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(settings_from(&[("LISTEN_ADDR", "localhost")]).is_err());
        assert!(settings_from(&[("REPLY_ENDPOINT", "not a url")]).is_err());
        assert!(settings_from(&[("TYPING_INTERVAL_MS", "fast")]).is_err());
    }
}
