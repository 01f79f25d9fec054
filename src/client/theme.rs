use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌞",
            Theme::Dark => "🌙",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Theme store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Theme store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistence for the single theme preference
pub trait ThemeStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Theme>, ThemeError>;
    fn save(&self, theme: Theme) -> Result<(), ThemeError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: Theme,
}

/// Stores `{"theme": "light"|"dark"}` in a JSON file
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredTheme = serde_json::from_str(&content)?;
        Ok(Some(stored.theme))
    }

    fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoredTheme { theme })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Application-wide theme value with get/set/subscribe.
/// Read from the store once on creation, written back on every change.
pub struct ThemeState {
    store: Arc<dyn ThemeStore>,
    tx: watch::Sender<Theme>,
}

impl ThemeState {
    pub fn load(store: Arc<dyn ThemeStore>) -> Self {
        let initial = match store.load() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                warn!("Could not read theme preference, using default: {}", e);
                Theme::default()
            }
        };
        debug!("Theme: {:?}", initial);
        let (tx, _rx) = watch::channel(initial);
        Self { store, tx }
    }

    pub fn get(&self) -> Theme {
        *self.tx.borrow()
    }

    pub fn set(&self, theme: Theme) -> Result<(), ThemeError> {
        self.tx.send_replace(theme);
        self.store.save(theme)
    }

    pub fn toggle(&self) -> Result<Theme, ThemeError> {
        let next = self.get().toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }
}
