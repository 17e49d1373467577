use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use log::{debug, info, warn};
use tokio::sync::watch;

use crate::config::Settings;
use crate::error::StoreError;

/// Key-value persistence for the settings record.
///
/// Every successful [`SettingsStore::save`] is published to subscribers, which
/// is how the dashboard and the daemon learn that they must recompute.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings, StoreError>;

    async fn save(&self, settings: &Settings) -> Result<(), StoreError>;

    fn subscribe(&self) -> watch::Receiver<Settings>;

    /// Picks up writes made outside this process and publishes them.
    /// Returns whether a change was published. Stores with a single writer
    /// never see outside edits.
    async fn refresh(&self) -> bool {
        false
    }

    /// Like `load`, but a broken store degrades to built-in defaults.
    async fn get(&self) -> Settings {
        match self.load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("settings unavailable, using defaults: {}", e);
                Settings::default()
            }
        }
    }
}

/// Read-modify-write on the single settings record.
pub async fn update_settings<F>(store: &dyn SettingsStore, apply: F) -> Result<Settings, StoreError>
where
    F: FnOnce(&mut Settings) + Send,
{
    let mut settings = store.get().await;
    apply(&mut settings);
    store.save(&settings).await?;
    Ok(settings)
}

/// Settings persisted as `settings.toml` in the platform config directory.
pub struct FileSettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl FileSettingsStore {
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = ProjectDirs::from("", "", "ramadan-time").ok_or(StoreError::NoConfigDir)?;
        Ok(dirs.config_dir().join("settings.toml"))
    }

    pub async fn open_default() -> Result<Self, StoreError> {
        Ok(Self::open(Self::default_path()?).await)
    }

    /// Opens the store and seeds the change channel with what is on disk.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = match read_settings(&path).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("settings unavailable, using defaults: {}", e);
                Settings::default()
            }
        };
        let (tx, _rx) = watch::channel(initial);
        Self { path, tx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False before anything was ever saved, i.e. a fresh install.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        read_settings(&self.path).await
    }

    async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let settings = settings.clone().normalized();
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let content = toml::to_string_pretty(&settings)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!("saved settings to {:?}", self.path);
        self.tx.send_replace(settings);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Re-reads the file and publishes it when another process changed it.
    async fn refresh(&self) -> bool {
        let on_disk = match read_settings(&self.path).await {
            Ok(settings) => settings,
            Err(e) => {
                debug!("skipping settings refresh: {}", e);
                return false;
            }
        };
        let changed = self.tx.send_if_modified(|current| {
            if *current == on_disk {
                false
            } else {
                *current = on_disk;
                true
            }
        });
        if changed {
            info!("settings changed on disk ({:?})", self.path);
        }
        changed
    }
}

async fn read_settings(path: &Path) -> Result<Settings, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings.normalized())
}
