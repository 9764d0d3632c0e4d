use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 12;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join("corkboard/config.toml"))
    }

    /// Load configuration from the user config file, falling back to defaults.
    /// `CORKBOARD_BIND` overrides the file value.
    pub fn load() -> Self {
        Self::load_path(None)
    }

    /// Like `load`, but an explicit file path takes precedence over the user
    /// config location.
    pub fn load_path(path: Option<PathBuf>) -> Self {
        let file = path.or_else(Self::config_path);
        let mut config = file
            .as_deref()
            .and_then(Self::read_file)
            .unwrap_or_default();
        if let Ok(bind) = std::env::var("CORKBOARD_BIND") {
            config.bind_addr = Some(bind);
        }
        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    pub fn effective_bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or("127.0.0.1:8017")
    }
}
