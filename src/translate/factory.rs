use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use crate::config::TranslatorConfig;

use super::gemini::GeminiTranslator;
use super::interface::TranslatorInterface;

/// Factory for creating translation clients
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator based on the configuration.
    ///
    /// # Arguments
    /// * `config` - Translator configuration (provider, model, credential)
    ///
    /// # Returns
    /// Shared TranslatorInterface implementation
    pub fn create(config: &TranslatorConfig) -> Result<Arc<dyn TranslatorInterface>> {
        info!("Initializing translator: {}", config.provider);

        match config.provider.as_str() {
            "gemini_translator" => Ok(Arc::new(GeminiTranslator::new(config)?)),
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }
}
