use crate::models::{ChatMessage, ConnectionStatus, Role};
use crate::relay::RelayError;

/// How long a failed send keeps the status dot red.
pub const RECOVERY_DELAY_MS: u32 = 2_000;

/// The only failure text the user ever sees in the transcript.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

const LISTENING_NOTE: &str = "🎤 Listening...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetState {
    pub is_minimized: bool,
    pub is_listening: bool,
    pub status: ConnectionStatus,
    pub status_label: &'static str,
}

/// A submission accepted by [`WidgetController::begin_submit`] that still
/// needs its relay round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSend {
    pub seq: u64,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Latest send succeeded; status is `ready`.
    Ready,
    /// Latest send failed; arm the recovery timer for `seq`.
    Failed { seq: u64 },
    /// A newer send started meanwhile. The reply was appended but status
    /// was left to the newer send.
    Stale,
}

impl SendOutcome {
    /// The send whose recovery timer should be armed, if any.
    pub fn recovery_seq(&self) -> Option<u64> {
        match self {
            SendOutcome::Failed { seq } => Some(*seq),
            SendOutcome::Ready | SendOutcome::Stale => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    Start,
    Stop,
    Unsupported,
}

/// Widget state plus transcript. Every mutation goes through one of the
/// event methods below; the async relay hop and the timers live in the
/// view layer, which feeds results back in.
#[derive(Clone, Debug)]
pub struct WidgetController {
    state: WidgetState,
    transcript: Vec<ChatMessage>,
    voice_note: Option<String>,
    latest_seq: u64,
    next_message_id: u64,
}

impl Default for WidgetController {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetController {
    pub fn new() -> Self {
        Self {
            state: WidgetState {
                is_minimized: false,
                is_listening: false,
                status: ConnectionStatus::Connecting,
                status_label: "Connecting...",
            },
            transcript: Vec::new(),
            voice_note: None,
            latest_seq: 0,
            next_message_id: 0,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn voice_note(&self) -> Option<&str> {
        self.voice_note.as_deref()
    }

    // ── Connection ────────────────────────────────────────────────────────────

    pub fn begin_connection(&mut self) {
        self.set_status(ConnectionStatus::Connecting, "Connecting...");
    }

    pub fn connection_finished(&mut self, result: Result<(), RelayError>) {
        match result {
            Ok(()) => self.set_status(ConnectionStatus::Ready, "Ready"),
            Err(e) => {
                log::error!("Failed to connect to relay: {e}");
                self.set_status(ConnectionStatus::Error, "Connection Error");
            }
        }
    }

    // ── Sending ───────────────────────────────────────────────────────────────

    /// Accepts `text` for sending. Blank input is ignored and yields `None`.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingSend> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }

        self.latest_seq += 1;
        self.push(Role::User, message.to_string());
        self.set_status(ConnectionStatus::Thinking, "Processing...");

        Some(PendingSend { seq: self.latest_seq, message: message.to_string() })
    }

    /// Records the outcome of send `seq`. Only the most recent send may
    /// move the status.
    pub fn finish_submit(&mut self, seq: u64, result: Result<String, RelayError>) -> SendOutcome {
        let is_latest = seq == self.latest_seq;

        match result {
            Ok(reply) => {
                self.push(Role::Assistant, reply);
                if !is_latest {
                    return SendOutcome::Stale;
                }
                self.set_status(ConnectionStatus::Ready, "Ready");
                SendOutcome::Ready
            }
            Err(e) => {
                log::error!("Error sending message #{seq}: {e}");
                self.push(Role::Error, ERROR_REPLY.to_string());
                if !is_latest {
                    return SendOutcome::Stale;
                }
                self.set_status(ConnectionStatus::Error, "Error");
                SendOutcome::Failed { seq }
            }
        }
    }

    /// Fired by the recovery timer of send `seq`. Returns whether the
    /// status changed.
    pub fn recover(&mut self, seq: u64) -> bool {
        if seq != self.latest_seq || self.state.status != ConnectionStatus::Error {
            return false;
        }
        self.set_status(ConnectionStatus::Ready, "Ready");
        true
    }

    // ── Voice ─────────────────────────────────────────────────────────────────

    pub fn toggle_voice(&mut self, available: bool) -> VoiceCommand {
        if !available {
            return VoiceCommand::Unsupported;
        }
        if self.state.is_listening {
            self.stop_listening();
            return VoiceCommand::Stop;
        }
        self.state.is_listening = true;
        self.voice_note = Some(LISTENING_NOTE.to_string());
        VoiceCommand::Start
    }

    /// First final utterance: stop listening and submit it.
    pub fn voice_transcript(&mut self, transcript: &str) -> Option<PendingSend> {
        self.stop_listening();
        self.begin_submit(transcript)
    }

    pub fn voice_error(&mut self, code: &str) {
        self.state.is_listening = false;
        self.voice_note = Some(format!("Error: {code}"));
    }

    /// The recognizer stopped on its own. An error note survives so it can
    /// be read before [`clear_voice_note`](Self::clear_voice_note) runs.
    pub fn voice_ended(&mut self) {
        if self.state.is_listening {
            self.stop_listening();
        }
    }

    pub fn clear_voice_note(&mut self) {
        if !self.state.is_listening {
            self.voice_note = None;
        }
    }

    fn stop_listening(&mut self) {
        self.state.is_listening = false;
        self.voice_note = None;
    }

    // ── Window ────────────────────────────────────────────────────────────────

    pub fn toggle_minimized(&mut self) -> bool {
        self.state.is_minimized = !self.state.is_minimized;
        self.state.is_minimized
    }

    fn set_status(&mut self, status: ConnectionStatus, label: &'static str) {
        self.state.status = status;
        self.state.status_label = label;
    }

    fn push(&mut self, role: Role, text: String) {
        self.transcript.push(ChatMessage { id: self.next_message_id, role, text });
        self.next_message_id += 1;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::relay::testing::ScriptedTransport;
    use crate::relay::RelayClient;

    fn ready() -> WidgetController {
        let mut c = WidgetController::new();
        c.begin_connection();
        c.connection_finished(Ok(()));
        c
    }

    fn entries(c: &WidgetController) -> Vec<(Role, &str)> {
        c.transcript().iter().map(|m| (m.role, m.text.as_str())).collect()
    }

    #[test]
    fn starts_connecting_then_ready() {
        let mut c = WidgetController::new();
        assert_eq!(c.state().status, ConnectionStatus::Connecting);
        assert_eq!(c.state().status_label, "Connecting...");
        c.connection_finished(Ok(()));
        assert_eq!(c.state().status, ConnectionStatus::Ready);
    }

    #[test]
    fn failed_connection_shows_connection_error() {
        let mut c = WidgetController::new();
        c.connection_finished(Err(RelayError::ConnectError("down".to_string())));
        assert_eq!(c.state().status, ConnectionStatus::Error);
        assert_eq!(c.state().status_label, "Connection Error");
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let mut c = ready();
        assert_eq!(c.begin_submit(""), None);
        assert_eq!(c.begin_submit("  \n\t "), None);
        assert!(c.transcript().is_empty());
        assert_eq!(c.state().status, ConnectionStatus::Ready);
    }

    #[test]
    fn submit_appends_user_entry_before_reply() {
        let mut c = ready();
        let pending = c.begin_submit("  hello ").unwrap();
        assert_eq!(pending.message, "hello");
        assert_eq!(entries(&c), vec![(Role::User, "hello")]);
        assert_eq!(c.state().status, ConnectionStatus::Thinking);
        assert_eq!(c.state().status_label, "Processing...");
    }

    #[test]
    fn successful_round_trip_through_relay() {
        let relay = RelayClient::with_transport(
            ScriptedTransport::replying(vec![ScriptedTransport::ok(
                r#"{"response":"hi there","timestamp":123}"#,
            )]),
            "http://localhost:3001",
        );
        let mut c = WidgetController::new();
        c.connection_finished(block_on(relay.connect()));

        let pending = c.begin_submit("hello").unwrap();
        let outcome = c.finish_submit(pending.seq, block_on(relay.send(&pending.message)));

        assert_eq!(outcome, SendOutcome::Ready);
        assert_eq!(entries(&c), vec![(Role::User, "hello"), (Role::Assistant, "hi there")]);
        assert_eq!(c.state().status, ConnectionStatus::Ready);
    }

    #[test]
    fn server_error_shows_fixed_message_then_recovers() {
        let relay = RelayClient::with_transport(
            ScriptedTransport::replying(vec![ScriptedTransport::status(500, "{}")]),
            "http://localhost:3001",
        );
        let mut c = WidgetController::new();
        c.connection_finished(block_on(relay.connect()));

        let pending = c.begin_submit("hello").unwrap();
        let outcome = c.finish_submit(pending.seq, block_on(relay.send(&pending.message)));

        assert_eq!(outcome, SendOutcome::Failed { seq: pending.seq });
        assert_eq!(entries(&c), vec![(Role::User, "hello"), (Role::Error, ERROR_REPLY)]);
        assert_eq!(c.state().status, ConnectionStatus::Error);
        assert_eq!(c.state().status_label, "Error");

        assert!(c.recover(pending.seq));
        assert_eq!(c.state().status, ConnectionStatus::Ready);
    }

    #[test]
    fn every_error_kind_renders_the_same_entry() {
        let mut c = ready();
        for err in [
            RelayError::NotConnected,
            RelayError::HttpError { status: 404 },
            RelayError::DecodeError("eof".to_string()),
            RelayError::Network("refused".to_string()),
        ] {
            let pending = c.begin_submit("x").unwrap();
            c.finish_submit(pending.seq, Err(err));
            assert_eq!(c.transcript().last().unwrap().text, ERROR_REPLY);
        }
    }

    #[test]
    fn stale_completion_does_not_touch_status() {
        let mut c = ready();
        let first = c.begin_submit("first").unwrap();
        let second = c.begin_submit("second").unwrap();
        assert!(second.seq > first.seq);

        assert_eq!(c.finish_submit(second.seq, Ok("two".to_string())), SendOutcome::Ready);
        assert_eq!(
            c.finish_submit(first.seq, Err(RelayError::HttpError { status: 500 })),
            SendOutcome::Stale
        );

        assert_eq!(c.state().status, ConnectionStatus::Ready);
        assert_eq!(
            entries(&c),
            vec![
                (Role::User, "first"),
                (Role::User, "second"),
                (Role::Assistant, "two"),
                (Role::Error, ERROR_REPLY),
            ]
        );
    }

    #[test]
    fn recovery_from_older_send_is_ignored_after_new_send() {
        let mut c = ready();
        let first = c.begin_submit("first").unwrap();
        c.finish_submit(first.seq, Err(RelayError::HttpError { status: 500 }));

        let second = c.begin_submit("second").unwrap();
        assert!(!c.recover(first.seq));
        assert_eq!(c.state().status, ConnectionStatus::Thinking);

        c.finish_submit(second.seq, Ok("ok".to_string()));
        assert!(!c.recover(second.seq));
        assert_eq!(c.state().status, ConnectionStatus::Ready);
    }

    #[test]
    fn message_ids_follow_insertion_order() {
        let mut c = ready();
        let p = c.begin_submit("a").unwrap();
        c.finish_submit(p.seq, Ok("b".to_string()));
        let ids: Vec<u64> = c.transcript().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn toggle_minimized_flips() {
        let mut c = ready();
        assert!(c.toggle_minimized());
        assert!(c.state().is_minimized);
        assert!(!c.toggle_minimized());
    }

    #[test]
    fn voice_unavailable_is_a_noop() {
        let mut c = ready();
        assert_eq!(c.toggle_voice(false), VoiceCommand::Unsupported);
        assert!(!c.state().is_listening);
        assert_eq!(c.voice_note(), None);
    }

    #[test]
    fn voice_toggle_starts_and_stops() {
        let mut c = ready();
        assert_eq!(c.toggle_voice(true), VoiceCommand::Start);
        assert!(c.state().is_listening);
        assert_eq!(c.voice_note(), Some("🎤 Listening..."));

        assert_eq!(c.toggle_voice(true), VoiceCommand::Stop);
        assert!(!c.state().is_listening);
        assert_eq!(c.voice_note(), None);
    }

    #[test]
    fn voice_transcript_stops_listening_and_submits() {
        let mut c = ready();
        c.toggle_voice(true);
        let pending = c.voice_transcript("push mid").unwrap();
        assert_eq!(pending.message, "push mid");
        assert!(!c.state().is_listening);
        assert_eq!(entries(&c), vec![(Role::User, "push mid")]);
    }

    #[test]
    fn voice_error_is_shown_until_cleared() {
        let mut c = ready();
        c.toggle_voice(true);
        c.voice_error("no-speech");
        c.voice_ended();
        assert!(!c.state().is_listening);
        assert_eq!(c.voice_note(), Some("Error: no-speech"));

        c.clear_voice_note();
        assert_eq!(c.voice_note(), None);
    }
}
