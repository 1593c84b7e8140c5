use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;
use tokio::sync::mpsc;

use super::components::*;
use crate::chat::{ChatState, ChatStore, Message, RevealEvent, Sender};
use crate::settings::Settings;

impl ChatStore for UseRef<ChatState> {
    fn with_chat<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut *self.write())
    }
}

pub fn app(cx: Scope) -> Element {
    let (tx, rx) = mpsc::unbounded_channel::<RevealEvent>();

    let session = use_ref(cx, || Settings::global().chat_session(tx));
    let state = use_ref(cx, ChatState::new);
    let draft = use_ref(cx, String::new);

    use_future(cx, (), move |_| {
        let mut rx = rx;
        to_owned![state];
        async move {
            while let Some(event) = rx.recv().await {
                state.write().apply(event);
            }
        }
    });

    let send = move |_: ()| {
        let text = draft.read().clone();
        let Some(query) = state.with_chat(|chat| chat.begin_turn(&text)) else {
            return;
        };
        draft.set(String::new());

        cx.spawn({
            let session = session.read().clone();
            to_owned![state];

            async move {
                session.respond(&state, &query).await;
            }
        });
    };

    let send_enter = move |e: Event<KeyboardData>| {
        if let Key::Enter = e.data.key() {
            send(());
        }
    };

    let send_button = move |_| {
        send(());
    };

    let (messages, busy, shown) = {
        let chat = state.read();
        let messages: Vec<Message> = chat.conversation().iter().cloned().collect();
        let shown = chat.typing().unwrap_or_default().to_string();
        (messages, chat.is_busy(), shown)
    };
    let typing = !shown.is_empty();
    let send_label = if busy { "..." } else { "Send" };

    cx.render(rsx!(
        style { include_str!("./style.css") }
        div {
            id: "header",
            h1 {"Neon"}
        }
        div {
            id: "chat-window",
            class: "chat-window",
            for msg in messages.iter() {
                match msg.sender() {
                    Sender::User => rsx!(UserMessage { content: msg.text().to_string() }),
                    Sender::Bot => rsx!(BotMessage { content: msg.text().to_string() }),
                }
            }
            if typing {
                rsx!(TypingMessage { content: shown.clone() })
            }
            if busy {
                rsx!(Loading{})
            }
        }
        div {
            id: "input-area",
            UserInput {
                draft: draft,
                on_press: send_enter,
            }
            button {
                id: "send-button",
                onclick: send_button,
                "{send_label}"
            }
        }
    ))
}
