mod components;
mod controller;
mod models;
mod relay;
mod speech;
mod state;
mod timer;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::widget::AssistantWidget;
use relay::RelayClient;
use speech::SpeechCapability;
use state::WidgetHandle;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    // Explicit wiring: one relay client, one speech capability, one widget.
    WidgetHandle::provide(RelayClient::new(), SpeechCapability::detect());

    view! { <AssistantWidget /> }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
