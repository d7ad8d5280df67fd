use serde::{Deserialize, Serialize};
use std::fs;
use anyhow::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translator_config: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12801
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_provider() -> String {
    "gemini_translator".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl TranslatorConfig {
    /// Resolve the API credential from the configured environment variable.
    /// Returns None when the variable is unset or blank.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
system_config:
  host: 127.0.0.1
  port: 9000
  frontend_dir: web
translator_config:
  provider: gemini_translator
  model: gemini-2.5-flash
  api_key_env: MY_GEMINI_KEY
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.system_config.host, "127.0.0.1");
        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.system_config.frontend_dir, "web");
        assert_eq!(config.translator_config.provider, "gemini_translator");
        assert_eq!(config.translator_config.api_key_env, "MY_GEMINI_KEY");
        // Omitted fields fall back to defaults.
        assert_eq!(
            config.translator_config.base_url,
            "https://generativelanguage.googleapis.com"
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.system_config.port, 12801);
        assert_eq!(config.translator_config.model, "gemini-2.5-flash");
        assert_eq!(config.translator_config.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_resolved_api_key_missing() {
        let config = TranslatorConfig {
            api_key_env: "BHASHANTAR_TEST_KEY_UNSET".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(config.resolved_api_key().is_none());
    }

    #[test]
    fn test_resolved_api_key_present() {
        std::env::set_var("BHASHANTAR_TEST_KEY_PRESENT", "secret");
        let config = TranslatorConfig {
            api_key_env: "BHASHANTAR_TEST_KEY_PRESENT".to_string(),
            ..TranslatorConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_resolved_api_key_blank_is_none() {
        std::env::set_var("BHASHANTAR_TEST_KEY_BLANK", "   ");
        let config = TranslatorConfig {
            api_key_env: "BHASHANTAR_TEST_KEY_BLANK".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(config.resolved_api_key().is_none());
    }
}
