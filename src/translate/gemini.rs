use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::TranslatorConfig;
use crate::language::Language;

use super::interface::{TranslationError, TranslatorInterface};

#[derive(Debug, Serialize)]
struct GeminiPayload<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Translation client for the Gemini `generateContent` API.
#[derive(Debug)]
pub struct GeminiTranslator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiTranslator {
    /// Create the client from explicit configuration.
    ///
    /// The API credential is resolved here, once; a missing or blank
    /// credential is a construction failure so misconfiguration aborts
    /// startup instead of surfacing on the first user action.
    pub fn new(config: &TranslatorConfig) -> anyhow::Result<Self> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            anyhow::anyhow!("{} environment variable is not set", config.api_key_env)
        })?;

        info!(
            "Initialized GeminiTranslator: model={}, base_url={}",
            config.model, config.base_url
        );

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Build the instruction sent to the model. The source text goes inside
    /// a delimited block so the model cannot confuse payload with
    /// instruction.
    fn build_prompt(text: &str, target: Language) -> String {
        format!(
            "Translate the following English text to {target}. \
             Provide only the direct translation of the text itself, without any \
             additional explanations, introductory phrases, or labels like \
             \"{target} Translation:\".\n\n\
             English Text:\n\
             \"\"\"\n\
             {text}\n\
             \"\"\"\n"
        )
    }

    fn request_url(&self) -> String {
        // Gemini carries the key as a URL parameter, not a header.
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Pull the text out of the first candidate, concatenating its parts.
    /// None means the response carried no text at all.
    fn extract_text(response: GeminiResponse) -> Option<String> {
        let candidate = response.candidates.into_iter().next()?;
        let mut combined = None;
        for part in candidate.content.parts {
            if let Some(text) = part.text {
                combined.get_or_insert_with(String::new).push_str(&text);
            }
        }
        combined
    }
}

#[async_trait]
impl TranslatorInterface for GeminiTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslationError> {
        let prompt = Self::build_prompt(text, target);
        let payload = GeminiPayload {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.request_url())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                error!("Error translating to {}: request failed: {}", target, err);
                TranslationError
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                "Error translating to {}: API returned {}: {}",
                target, status, body
            );
            return Err(TranslationError);
        }

        let data: GeminiResponse = response.json().await.map_err(|err| {
            error!("Error translating to {}: invalid response: {}", target, err);
            TranslationError
        })?;

        match Self::extract_text(data) {
            Some(translated) => Ok(translated.trim().to_string()),
            None => {
                error!("Error translating to {}: response contained no text", target);
                Err(TranslationError)
            }
        }
    }
}
