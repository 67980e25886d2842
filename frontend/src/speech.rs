use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{SpeechRecognition, SpeechRecognitionEvent};

const SPEECH_LOCALE: &str = "en-US";

/// Constructor names probed on `window`, standard name first.
const RECOGNIZER_CONSTRUCTORS: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("Speech recognition error: {code}")]
    Recognition { code: String },

    #[error("Failed to start speech recognition: {0}")]
    Start(String),
}

impl SpeechError {
    /// Short code shown in the voice status line.
    pub fn code(&self) -> &str {
        match self {
            SpeechError::Recognition { code } => code,
            SpeechError::Start(_) => "start-failed",
        }
    }
}

/// Whether the host browser offers speech recognition, resolved once at
/// startup.
pub enum SpeechCapability {
    Available(SpeechRecognition),
    Unavailable,
}

impl SpeechCapability {
    /// Probes `window` for a recognizer constructor and configures a
    /// single-utterance, final-results-only instance.
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            return SpeechCapability::Unavailable;
        };

        let ctor = RECOGNIZER_CONSTRUCTORS.iter().find_map(|name| {
            js_sys::Reflect::get(&window, &JsValue::from_str(name))
                .ok()
                .filter(|v| v.is_function())
                .map(|v| v.unchecked_into::<js_sys::Function>())
        });
        let Some(ctor) = ctor else {
            log::warn!("Speech recognition not supported");
            return SpeechCapability::Unavailable;
        };

        match js_sys::Reflect::construct(&ctor, &js_sys::Array::new()) {
            Ok(obj) => {
                let recognition: SpeechRecognition = obj.unchecked_into();
                recognition.set_continuous(false);
                recognition.set_interim_results(false);
                recognition.set_lang(SPEECH_LOCALE);
                SpeechCapability::Available(recognition)
            }
            Err(e) => {
                log::warn!("Speech recognition unusable: {e:?}");
                SpeechCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SpeechCapability::Available(_))
    }

    pub fn start(&self) -> Result<(), SpeechError> {
        match self {
            SpeechCapability::Available(recognition) => recognition
                .start()
                .map_err(|e| SpeechError::Start(format!("{e:?}"))),
            SpeechCapability::Unavailable => Ok(()),
        }
    }

    pub fn stop(&self) {
        if let SpeechCapability::Available(recognition) = self {
            recognition.stop();
        }
    }

    /// Wires the recognizer's events. Handlers live for the page's lifetime.
    pub fn bind(
        &self,
        on_transcript: impl Fn(String) + 'static,
        on_error: impl Fn(SpeechError) + 'static,
        on_end: impl Fn() + 'static,
    ) {
        let SpeechCapability::Available(recognition) = self else {
            return;
        };

        let onresult = Closure::<dyn Fn(SpeechRecognitionEvent)>::new(
            move |ev: SpeechRecognitionEvent| {
                let transcript = ev
                    .results()
                    .and_then(|results| results.get(0))
                    .and_then(|result| result.get(0))
                    .map(|alternative| alternative.transcript());
                if let Some(text) = transcript {
                    on_transcript(text);
                }
            },
        );
        recognition.set_onresult(Some(onresult.as_ref().unchecked_ref()));
        onresult.forget();

        let onerror = Closure::<dyn Fn(JsValue)>::new(move |ev: JsValue| {
            let code = js_sys::Reflect::get(&ev, &JsValue::from_str("error"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| "unknown".to_string());
            log::error!("Speech recognition error: {code}");
            on_error(SpeechError::Recognition { code });
        });
        recognition.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        let onend = Closure::<dyn Fn()>::new(on_end);
        recognition.set_onend(Some(onend.as_ref().unchecked_ref()));
        onend.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_for_status_line() {
        let err = SpeechError::Recognition { code: "not-allowed".to_string() };
        assert_eq!(err.code(), "not-allowed");
        assert_eq!(err.to_string(), "Speech recognition error: not-allowed");
        assert_eq!(SpeechError::Start("busy".to_string()).code(), "start-failed");
    }

    #[test]
    fn unavailable_capability_is_inert() {
        let speech = SpeechCapability::Unavailable;
        assert!(!speech.is_available());
        assert_eq!(speech.start(), Ok(()));
        speech.stop();
    }
}
