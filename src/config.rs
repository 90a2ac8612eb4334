use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Settings read from the `rc` file.
///
/// The file holds `key=value` lines; blank lines and lines starting with `#`
/// are ignored, as are unknown keys.
///
/// ```text
/// data.location=./crm.db
/// auth.user=admin@crm.com
/// log.level=info
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the rc file and the default database
    pub base_dir: PathBuf,
    pub data_location: Option<PathBuf>,
    pub acting_user: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Base directory: `$CRM_HOME` if set, otherwise `~/.crm`
    pub fn base_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os("CRM_HOME") {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".crm"))
    }

    /// Load the rc file from the base directory; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let base_dir = Self::base_dir()?;
        Self::load_from(&base_dir)
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let rc_path = base_dir.join("rc");
        let mut config = Config {
            base_dir: base_dir.to_path_buf(),
            ..Config::default()
        };
        if rc_path.exists() {
            let content = std::fs::read_to_string(&rc_path)
                .with_context(|| format!("Failed to read config: {}", rc_path.display()))?;
            config.apply(&content);
        }
        Ok(config)
    }

    fn apply(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    // Relative paths are resolved against the rc directory
                    self.data_location = Some(if path.is_relative() {
                        self.base_dir.join(path)
                    } else {
                        path
                    });
                }
                "auth.user" => self.acting_user = Some(value.to_lowercase()),
                "log.level" => self.log_level = Some(value.to_string()),
                other => log::debug!("Ignoring unknown config key: {}", other),
            }
        }
    }

    /// Database path: `data.location` or `<base>/crm.db`
    pub fn database_path(&self) -> PathBuf {
        self.data_location
            .clone()
            .unwrap_or_else(|| self.base_dir.join("crm.db"))
    }
}
