use std::sync::Arc;

use reqwest::Client;
use tripo::TripoClient;

use crate::config::Config;
use crate::error::AppError;
use crate::services::{MemoryTaskStore, TaskMonitor, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
    pub tripo: Option<Arc<TripoClient>>,
    pub store: Arc<dyn TaskStore>,
    pub monitor: Arc<TaskMonitor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http_client = Client::new();

        let tripo = config.api_key.as_ref().map(|api_key| {
            let mut client = TripoClient::with_client(http_client.clone(), api_key.clone())
                .with_downloads_dir(&config.downloads_dir);
            if let Some(base_url) = &config.base_url {
                client = client.with_base_url(base_url.clone());
            }
            Arc::new(client)
        });

        let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
        let monitor = Arc::new(TaskMonitor::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            http_client,
            tripo,
            store,
            monitor,
        }
    }

    /// The remote API client, or the per-request "not configured" error when
    /// the credential was absent at startup.
    pub fn tripo(&self) -> Result<&Arc<TripoClient>, AppError> {
        self.tripo.as_ref().ok_or(AppError::NotConfigured)
    }
}
