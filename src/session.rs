use serde::Serialize;
use thiserror::Error;

use crate::language::Language;

/// Upper bound on the source text, in characters. The frontend textarea
/// enforces the same limit with `maxlength`.
pub const MAX_INPUT_CHARS: usize = 20_000;

/// The one message shown for any failed translation attempt. The actual
/// cause only appears in the logs.
pub const TRANSLATION_FAILED_MESSAGE: &str =
    "Failed to translate. Please check your API key and try again.";

/// Why a translate action was refused before reaching the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslateRejection {
    #[error("Please enter some text to translate.")]
    EmptyInput,
    #[error("Input exceeds the {} character limit.", MAX_INPUT_CHARS)]
    InputTooLong,
    #[error("A translation is already in progress.")]
    AlreadyPending,
}

/// Payload handed to the translator task when a translate action is accepted.
#[derive(Debug, Clone)]
pub struct PendingTranslation {
    pub seq: u64,
    pub text: String,
    pub target: Language,
}

/// The downloadable result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub content: String,
}

/// Per-client UI state, owned by the session map and mutated only through
/// the methods below.
///
/// A translate action moves the state to Pending (loading set, prior error
/// and result cleared) and bumps `request_seq`; a settle call only applies
/// when it carries the latest sequence, so a response from a superseded
/// request can never overwrite a newer one.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub input_text: String,
    pub target_language: Language,
    pub translated_text: String,
    pub is_loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    request_seq: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            target_language: Language::default_selection(),
            translated_text: String::new(),
            is_loading: false,
            error: None,
            request_seq: 0,
        }
    }

    /// Store the input text, clamped to `MAX_INPUT_CHARS` characters the way
    /// the textarea's `maxlength` clamps what can be typed.
    pub fn set_input(&mut self, text: &str) {
        if text.chars().count() > MAX_INPUT_CHARS {
            self.input_text = text.chars().take(MAX_INPUT_CHARS).collect();
        } else {
            self.input_text = text.to_string();
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.target_language = language;
    }

    /// Validate and enter the Pending state.
    ///
    /// Empty or over-long input is refused without touching the loading flag;
    /// the refusal message lands in `error` so the UI shows it. A translate
    /// while one is already in flight is refused without any state change.
    pub fn begin_translate(&mut self) -> Result<PendingTranslation, TranslateRejection> {
        if self.is_loading {
            return Err(TranslateRejection::AlreadyPending);
        }
        if self.input_text.trim().is_empty() {
            let rejection = TranslateRejection::EmptyInput;
            self.error = Some(rejection.to_string());
            return Err(rejection);
        }
        if self.input_text.chars().count() > MAX_INPUT_CHARS {
            let rejection = TranslateRejection::InputTooLong;
            self.error = Some(rejection.to_string());
            return Err(rejection);
        }

        self.is_loading = true;
        self.error = None;
        self.translated_text.clear();
        self.request_seq += 1;

        Ok(PendingTranslation {
            seq: self.request_seq,
            text: self.input_text.clone(),
            target: self.target_language,
        })
    }

    /// Apply a successful translation. Returns false and leaves the state
    /// alone when `seq` is not the latest issued sequence.
    pub fn settle_success(&mut self, seq: u64, text: String) -> bool {
        if seq != self.request_seq {
            return false;
        }
        self.translated_text = text;
        self.is_loading = false;
        true
    }

    /// Apply a failed translation with the user-visible message. Same
    /// sequence rule as `settle_success`.
    pub fn settle_failure(&mut self, seq: u64, message: &str) -> bool {
        if seq != self.request_seq {
            return false;
        }
        self.error = Some(message.to_string());
        self.is_loading = false;
        true
    }

    /// Reset input, result, and error. Deliberately leaves `request_seq` and
    /// the loading flag alone: an in-flight request still settles afterwards
    /// (last-write-wins).
    pub fn clear(&mut self) {
        self.input_text.clear();
        self.translated_text.clear();
        self.error = None;
    }

    /// The download file, available only when a non-empty result is on
    /// display and nothing is in flight.
    pub fn download_artifact(&self) -> Option<DownloadArtifact> {
        if self.is_loading || self.translated_text.is_empty() {
            return None;
        }
        Some(DownloadArtifact {
            file_name: format!("translation-{}.txt", self.target_language.label()),
            content: self.translated_text.clone(),
        })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = SessionState::new();
        assert_eq!(session.input_text, "");
        assert_eq!(session.target_language, Language::Marathi);
        assert_eq!(session.translated_text, "");
        assert!(!session.is_loading);
        assert!(session.error.is_none());
    }

    #[test]
    fn test_whitespace_only_input_is_rejected() {
        let mut session = SessionState::new();
        session.set_input("   \n\t  ");
        let result = session.begin_translate();
        assert_eq!(result.unwrap_err(), TranslateRejection::EmptyInput);
        assert!(!session.is_loading);
        assert_eq!(
            session.error.as_deref(),
            Some("Please enter some text to translate.")
        );
    }

    #[test]
    fn test_begin_translate_enters_pending() {
        let mut session = SessionState::new();
        session.set_input("Hello, how are you?");
        session.set_language(Language::Hindi);
        session.error = Some("stale error".to_string());
        session.translated_text = "stale result".to_string();

        let pending = session.begin_translate().unwrap();
        assert_eq!(pending.text, "Hello, how are you?");
        assert_eq!(pending.target, Language::Hindi);
        assert!(session.is_loading);
        assert!(session.error.is_none());
        assert_eq!(session.translated_text, "");
    }

    #[test]
    fn test_second_translate_while_pending_is_rejected() {
        let mut session = SessionState::new();
        session.set_input("Good morning");
        let pending = session.begin_translate().unwrap();

        let second = session.begin_translate();
        assert_eq!(second.unwrap_err(), TranslateRejection::AlreadyPending);
        // The rejection leaves the pending request untouched.
        assert!(session.is_loading);
        assert!(session.error.is_none());
        assert!(session.settle_success(pending.seq, "सुप्रभात".to_string()));
    }

    #[test]
    fn test_settle_success_displays_result() {
        let mut session = SessionState::new();
        session.set_input("Hello, how are you?");
        session.set_language(Language::Hindi);
        let pending = session.begin_translate().unwrap();

        assert!(session.settle_success(pending.seq, "नमस्ते, आप कैसे हैं?".to_string()));
        assert_eq!(session.translated_text, "नमस्ते, आप कैसे हैं?");
        assert!(!session.is_loading);
        assert!(session.error.is_none());
    }

    #[test]
    fn test_settle_failure_shows_generic_message() {
        let mut session = SessionState::new();
        session.set_input("Hello");
        let pending = session.begin_translate().unwrap();

        assert!(session.settle_failure(pending.seq, TRANSLATION_FAILED_MESSAGE));
        assert_eq!(session.error.as_deref(), Some(TRANSLATION_FAILED_MESSAGE));
        assert!(!session.is_loading);
        assert_eq!(session.translated_text, "");
    }

    #[test]
    fn test_stale_settle_is_dropped() {
        let mut session = SessionState::new();
        session.set_input("First");
        let first = session.begin_translate().unwrap();
        session.settle_failure(first.seq, TRANSLATION_FAILED_MESSAGE);

        session.set_input("Second");
        let second = session.begin_translate().unwrap();

        // The first request resolving late must not clobber the second.
        assert!(!session.settle_success(first.seq, "stale".to_string()));
        assert!(session.is_loading);
        assert_eq!(session.translated_text, "");

        assert!(session.settle_success(second.seq, "दुसरा".to_string()));
        assert_eq!(session.translated_text, "दुसरा");
    }

    #[test]
    fn test_clear_resets_fields_from_any_state() {
        let mut session = SessionState::new();
        session.set_input("Hello");
        let pending = session.begin_translate().unwrap();
        session.settle_success(pending.seq, "नमस्ते".to_string());

        session.clear();
        assert_eq!(session.input_text, "");
        assert_eq!(session.translated_text, "");
        assert!(session.error.is_none());

        session.set_input("again");
        session.error = Some("oops".to_string());
        session.clear();
        assert_eq!(session.input_text, "");
        assert!(session.error.is_none());
    }

    #[test]
    fn test_result_arriving_after_clear_still_applies() {
        let mut session = SessionState::new();
        session.set_input("Hello");
        let pending = session.begin_translate().unwrap();

        session.clear();
        assert!(session.is_loading);

        // Last-write-wins: the in-flight result lands even though the user
        // cleared the form while it was pending.
        assert!(session.settle_success(pending.seq, "नमस्ते".to_string()));
        assert_eq!(session.translated_text, "नमस्ते");
        assert!(!session.is_loading);
    }

    #[test]
    fn test_set_input_clamps_to_limit() {
        let mut session = SessionState::new();
        let long = "a".repeat(MAX_INPUT_CHARS + 500);
        session.set_input(&long);
        assert_eq!(session.input_text.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_input_at_limit_is_accepted() {
        let mut session = SessionState::new();
        session.set_input(&"a".repeat(MAX_INPUT_CHARS));
        assert!(session.begin_translate().is_ok());
    }

    #[test]
    fn test_download_artifact_unavailable_without_result() {
        let session = SessionState::new();
        assert!(session.download_artifact().is_none());
    }

    #[test]
    fn test_download_artifact_unavailable_while_loading() {
        let mut session = SessionState::new();
        session.set_input("Hello");
        session.begin_translate().unwrap();
        assert!(session.download_artifact().is_none());
    }

    #[test]
    fn test_download_artifact_names_file_after_language() {
        let mut session = SessionState::new();
        session.set_input("Hello, how are you?");
        session.set_language(Language::Hindi);
        let pending = session.begin_translate().unwrap();
        session.settle_success(pending.seq, "नमस्ते, आप कैसे हैं?".to_string());

        let artifact = session.download_artifact().unwrap();
        assert_eq!(artifact.file_name, "translation-Hindi.txt");
        assert_eq!(artifact.content, "नमस्ते, आप कैसे हैं?");

        session.set_language(Language::Marathi);
        let artifact = session.download_artifact().unwrap();
        assert_eq!(artifact.file_name, "translation-Marathi.txt");
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut session = SessionState::new();
        session.set_input("Hello");
        session.set_language(Language::Hindi);

        let snapshot = serde_json::to_value(&session).unwrap();
        assert_eq!(snapshot["input_text"], "Hello");
        assert_eq!(snapshot["target_language"], "Hindi");
        assert_eq!(snapshot["is_loading"], false);
        assert_eq!(snapshot["error"], serde_json::Value::Null);
        assert!(snapshot.get("request_seq").is_none());
    }
}
