use async_trait::async_trait;
use thiserror::Error;

use crate::language::Language;

/// The single error a failed translation surfaces, whatever went wrong
/// underneath (transport, auth, quota, malformed response). The cause is
/// logged where it happens and never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to obtain translation from the language model")]
pub struct TranslationError;

/// Interface for a translation backend.
///
/// Implementations make exactly one outbound call per invocation; no retries.
#[async_trait]
pub trait TranslatorInterface: Send + Sync + std::fmt::Debug {
    /// Translate English `text` into the target language.
    ///
    /// Success is the model's response with surrounding whitespace trimmed;
    /// an empty string is a legal success and is the caller's to interpret.
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslationError>;
}
