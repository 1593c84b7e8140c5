#![allow(non_snake_case)]

use dioxus::prelude::*;

#[derive(PartialEq, Props)]
pub struct ContentProps {
    content: String,
}

pub fn UserMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-row user-row",
            div {
                class: "chat-message user-message",
                "{cx.props.content}"
            }
        }
    ))
}

pub fn BotMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-row bot-row",
            div {
                class: "chat-message bot-message",
                "{cx.props.content}"
            }
        }
    ))
}

/// The reply currently being revealed.
pub fn TypingMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-row bot-row",
            div {
                class: "chat-message bot-message typing",
                "{cx.props.content}"
            }
        }
    ))
}

pub fn Loading(cx: Scope) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-row bot-row",
            div {
                class: "chat-message bot-message",
                div {
                    class: "spinner",
                }
            }
        }
    ))
}

#[derive(Props)]
pub struct DraftProps<'a> {
    draft: &'a UseRef<String>,
    on_press: EventHandler<'a, Event<KeyboardData>>,
}

pub fn UserInput<'a>(cx: Scope<'a, DraftProps<'a>>) -> Element<'a> {
    let draft = cx.props.draft;
    cx.render(rsx!(input {
        id: "user-input",
        r#type: "text",
        placeholder: "Type a message...",
        value: "{draft.read()}",
        oninput: move |e| {
            draft.set(e.value.clone());
        },
        onkeydown: move |e| cx.props.on_press.call(e),
    }))
}
