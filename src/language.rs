use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target languages the translator supports.
///
/// The set is closed and ordered; the first entry is the default selection.
/// Every consumer goes through this enum, so extending the set is a change to
/// this module only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Marathi,
    Hindi,
}

impl Language {
    /// All supported target languages, in display order.
    pub fn all() -> &'static [Language] {
        &[Language::Marathi, Language::Hindi]
    }

    /// Default selection when a session starts.
    pub fn default_selection() -> Language {
        Language::Marathi
    }

    /// Human-readable display label. Also the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Marathi => "Marathi",
            Language::Hindi => "Hindi",
        }
    }

    /// Catalog as JSON for the frontend.
    pub fn catalog() -> serde_json::Value {
        serde_json::json!(Language::all()
            .iter()
            .map(|lang| serde_json::json!({ "label": lang.label() }))
            .collect::<Vec<_>>())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.label() == s)
            .ok_or_else(|| anyhow::anyhow!("Unsupported target language: {}", s))
    }
}
