use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::controller::{PendingSend, RECOVERY_DELAY_MS, VoiceCommand, WidgetController};
use crate::relay::RelayClient;
use crate::speech::SpeechCapability;
use crate::timer::TimerSlot;

/// Reactive handle to the widget, provided via Leptos context.
///
/// Owns the explicitly injected relay client and speech capability; all
/// state transitions are delegated to [`WidgetController`].
#[derive(Clone, Copy)]
pub struct WidgetHandle {
    pub controller: RwSignal<WidgetController>,
    pub input: RwSignal<String>,
    relay: StoredValue<Rc<RelayClient>, LocalStorage>,
    speech: StoredValue<SpeechCapability, LocalStorage>,
    recovery: StoredValue<TimerSlot<Timeout>, LocalStorage>,
    voice_note_timer: StoredValue<TimerSlot<Timeout>, LocalStorage>,
}

impl WidgetHandle {
    /// Create the handle, provide it in the current Leptos context, and
    /// start the initial connection.
    pub fn provide(relay: RelayClient, speech: SpeechCapability) -> Self {
        log::info!("Relay endpoint: {}", relay.endpoint());

        let handle = Self {
            controller: RwSignal::new(WidgetController::new()),
            input: RwSignal::new(String::new()),
            relay: StoredValue::new_local(Rc::new(relay)),
            speech: StoredValue::new_local(speech),
            recovery: StoredValue::new_local(TimerSlot::default()),
            voice_note_timer: StoredValue::new_local(TimerSlot::default()),
        };

        handle.speech.with_value(|speech| {
            speech.bind(
                move |transcript| handle.on_voice_transcript(transcript),
                move |err| handle.on_voice_error(err.code()),
                move || handle.controller.update(|c| c.voice_ended()),
            )
        });

        provide_context(handle);
        on_cleanup(move || handle.relay.with_value(|relay| relay.disconnect()));
        handle.begin_connection();
        handle
    }

    pub fn voice_available(&self) -> bool {
        self.speech.with_value(SpeechCapability::is_available)
    }

    fn begin_connection(&self) {
        self.controller.update(|c| c.begin_connection());
        let relay = self.relay.get_value();
        let controller = self.controller;
        spawn_local(async move {
            let result = relay.connect().await;
            controller.update(|c| c.connection_finished(result));
        });
    }

    /// Submit whatever is in the text input.
    pub fn submit_input(&self) {
        let text = self.input.get_untracked();
        let pending = self
            .controller
            .try_update(|c| c.begin_submit(&text))
            .flatten();
        if let Some(pending) = pending {
            self.input.set(String::new());
            self.dispatch(pending);
        }
    }

    pub fn toggle_minimized(&self) {
        self.controller.update(|c| {
            c.toggle_minimized();
        });
    }

    pub fn toggle_voice(&self) {
        let available = self.voice_available();
        let command = self.controller.try_update(|c| c.toggle_voice(available));
        match command {
            Some(VoiceCommand::Start) => {
                self.voice_note_timer.update_value(TimerSlot::cancel);
                if let Err(err) = self.speech.with_value(|s| s.start()) {
                    log::error!("{err}");
                    self.on_voice_error(err.code());
                }
            }
            Some(VoiceCommand::Stop) => self.speech.with_value(|s| s.stop()),
            Some(VoiceCommand::Unsupported) | None => {}
        }
    }

    fn on_voice_transcript(&self, transcript: String) {
        self.speech.with_value(|s| s.stop());
        let pending = self
            .controller
            .try_update(|c| c.voice_transcript(&transcript))
            .flatten();
        if let Some(pending) = pending {
            self.dispatch(pending);
        }
    }

    fn on_voice_error(&self, code: &str) {
        self.controller.update(|c| c.voice_error(code));
        let controller = self.controller;
        let timer = Timeout::new(RECOVERY_DELAY_MS, move || {
            controller.update(|c| c.clear_voice_note());
        });
        self.voice_note_timer.update_value(|slot| slot.arm(0, timer));
    }

    /// Fire the relay round trip for an accepted submission. Starting a new
    /// send drops (cancels) any pending recovery timer.
    fn dispatch(&self, pending: PendingSend) {
        self.recovery.update_value(|slot| {
            if let Some(seq) = slot.armed_for() {
                log::debug!("Cancelling recovery timer of send #{seq}");
            }
            slot.cancel();
        });

        let relay = self.relay.get_value();
        let controller = self.controller;
        let recovery = self.recovery;
        spawn_local(async move {
            let result = relay.send(&pending.message).await;
            let outcome = controller.try_update(|c| c.finish_submit(pending.seq, result));

            if let Some(seq) = outcome.and_then(|o| o.recovery_seq()) {
                let timer = Timeout::new(RECOVERY_DELAY_MS, move || {
                    controller.update(|c| {
                        c.recover(seq);
                    });
                });
                recovery.update_value(|slot| slot.arm(seq, timer));
            }
        });
    }
}
