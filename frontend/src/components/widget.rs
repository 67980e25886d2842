use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::models::{ChatMessage, Role};
use crate::state::WidgetHandle;

/// The overlay: header with status and minimize toggle, transcript, input.
#[component]
pub fn AssistantWidget() -> impl IntoView {
    let widget = expect_context::<WidgetHandle>();
    let minimized = move || widget.controller.with(|c| c.state().is_minimized);

    view! {
        <div id="assistant-container">
            <div class="assistant-window" class:minimized=minimized>
                <div class="assistant-header">
                    <StatusIndicator />
                    <button class="toggle-btn" on:click=move |_| widget.toggle_minimized()>
                        {move || if minimized() { "+" } else { "−" }}
                    </button>
                </div>
                <Transcript />
                <InputArea />
            </div>
        </div>
    }
}

#[component]
fn StatusIndicator() -> impl IntoView {
    let widget = expect_context::<WidgetHandle>();

    view! {
        <div class="status-indicator">
            <span class=move || {
                widget.controller.with(|c| format!("status-dot {}", c.state().status.as_str()))
            }></span>
            <span class="status-text">
                {move || widget.controller.with(|c| c.state().status_label)}
            </span>
        </div>
    }
}

/// Transcript in insertion order; keeps the newest entry in view.
#[component]
fn Transcript() -> impl IntoView {
    let widget = expect_context::<WidgetHandle>();
    let chat_area = NodeRef::<html::Div>::new();

    let messages = move || widget.controller.with(|c| c.transcript().to_vec());

    Effect::new(move |_| {
        widget.controller.with(|c| c.transcript().len());
        if let Some(el) = chat_area.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div id="chat-area" class="chat-area" node_ref=chat_area>
            {move || {
                widget.controller.with(|c| c.transcript().is_empty()).then(|| {
                    view! {
                        <div class="welcome-message">
                            "Ask me anything about the match. Type or use the mic."
                        </div>
                    }
                })
            }}
            <For each=messages key=|m| m.id let:msg>
                <MessageBubble message=msg />
            </For>
        </div>
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let css_class = match message.role {
        Role::User => "message user",
        Role::Assistant => "message assistant",
        Role::Error => "message error",
    };

    view! { <div class=css_class>{message.text}</div> }
}

/// Text input, send button, and the mic button when speech is available.
#[component]
fn InputArea() -> impl IntoView {
    let widget = expect_context::<WidgetHandle>();
    let listening = move || widget.controller.with(|c| c.state().is_listening);

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            widget.submit_input();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <input
                    id="text-input"
                    type="text"
                    placeholder="Type a message…"
                    prop:value=move || widget.input.get()
                    on:input=move |ev| widget.input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <Show when=move || widget.voice_available()>
                    <button
                        id="voice-btn"
                        class="voice-btn"
                        class:listening=listening
                        on:click=move |_| widget.toggle_voice()
                    >
                        "🎤"
                    </button>
                </Show>
                <button id="send-btn" class="send-btn" on:click=move |_| widget.submit_input()>
                    "Send"
                </button>
            </div>
            <div id="voice-status" class="voice-status">
                {move || widget.controller.with(|c| c.voice_note().unwrap_or_default().to_string())}
            </div>
        </div>
    }
}
