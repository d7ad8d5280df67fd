use std::sync::Arc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::session::SessionState;
use crate::translate::{TranslatorFactory, TranslatorInterface};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: Arc<dyn TranslatorInterface>,
    pub sessions: Arc<DashMap<String, SessionState>>,
    pub translation_tasks: Arc<DashMap<String, tokio::task::AbortHandle>>,
}

impl AppState {
    /// Build the process state. Fails when the translator cannot be
    /// constructed (unknown provider, missing credential).
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslatorFactory::create(&config.translator_config)?;

        Ok(Self {
            config,
            translator,
            sessions: Arc::new(DashMap::new()),
            translation_tasks: Arc::new(DashMap::new()),
        })
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
