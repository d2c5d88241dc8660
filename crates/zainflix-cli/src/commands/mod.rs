use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use zainflix_catalog::CatalogClient;
use zainflix_config::{Config, PathManager};
use zainflix_store::{FileStore, KeyValueStore, Page, ProfileRegistry, RouteAction, SessionStore, WatchListStore};

use crate::notify::NotificationCenter;
use crate::output::Output;

pub mod auth;
pub mod browse;
pub mod list;
pub mod play;
pub mod profile;

/// Everything a command needs, constructed once per invocation. Stores are
/// explicit service objects sharing one storage substrate; nothing is
/// ambient, so tests can swap in an in-memory store.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub session: SessionStore,
    pub lists: WatchListStore,
    pub registry: ProfileRegistry,
}

impl AppContext {
    pub fn init() -> Result<Self> {
        let paths = PathManager::default();
        paths.ensure_directories().map_err(|e| {
            color_eyre::eyre::eyre!("Failed to create application directories: {}", e)
        })?;

        let config_file = paths.config_file();
        let config = if config_file.exists() {
            Config::load_from_file(&config_file).map_err(|e| {
                color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e)
            })?
        } else {
            let config = Config::default();
            // Write the defaults so there is a file to put the token into
            config.save_to_file(&config_file).map_err(|e| {
                color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e)
            })?;
            debug!("Wrote default config to {}", config_file.display());
            config
        };

        let store: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::new(paths.storage_dir())
                .map_err(|e| color_eyre::eyre::eyre!("Failed to open storage: {}", e))?,
        );
        let session = SessionStore::new(Arc::clone(&store));
        let lists = WatchListStore::new(Arc::clone(&store), session.clone());
        let registry = ProfileRegistry::new(Arc::clone(&store), session.clone());

        Ok(Self {
            config,
            store,
            session,
            lists,
            registry,
        })
    }

    /// Catalog client; fails when the access token is not configured yet.
    pub fn catalog(&self) -> Result<CatalogClient> {
        self.config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Configuration validation failed: {}", e))?;
        Ok(CatalogClient::new(&self.config.catalog))
    }

    pub fn notifications(&self) -> NotificationCenter {
        NotificationCenter::new(
            self.config.ui.max_notifications,
            Duration::from_millis(self.config.ui.notification_timeout_ms),
        )
    }
}

/// Route guard in front of every command that maps onto a page of the web
/// app. A denied command reports where to go instead of proceeding.
pub fn require_page(session: &SessionStore, page: Page, output: &Output) -> bool {
    match session.protect_route(page) {
        RouteAction::Allow => true,
        RouteAction::Redirect(Page::Landing) => {
            output.error("Not signed in. Run `zainflix login --email <you@example.com>` first.");
            false
        }
        RouteAction::Redirect(Page::ProfileSelect) => {
            output.error("No profile selected. Run `zainflix profile switch <name>` first.");
            false
        }
        RouteAction::Redirect(page) => {
            output.info(format!("Already signed in; continue at {}.", page.file_name()));
            false
        }
    }
}
