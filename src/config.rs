use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace token the integration stores its host data under.
pub const DOMAIN: &str = "yandex_station";

/// Load environment variables from .env file.
/// Values may contain spaces without requiring quotes.
pub fn load_dotenv() {
    let env_path = Path::new(".env");
    if !env_path.exists() {
        return;
    }

    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in content.lines().filter_map(parse_dotenv_line) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: We're single-threaded at this point (called before any async runtime)
            unsafe { std::env::set_var(key, value) };
        }
    }
}

/// Split a `.env` line into key and value, skipping blanks and comments.
fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let mut value = line[eq_pos + 1..].trim();

    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value = &value[1..value.len() - 1];
    }

    Some((key, value))
}

/// Per-integration configuration, as kept in the host's config-entry storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Device names to expose as entities.
    #[serde(default)]
    pub include: Vec<String>,
}

impl IntegrationConfig {
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a device with this name passes the inclusion list.
    pub fn includes(&self, name: &str) -> bool {
        self.include.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub integration: IntegrationConfig,
    /// JSON fixture describing the device directory.
    pub fixture: Option<PathBuf>,
    /// Config entry the directory is attached to.
    pub entry_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integration: IntegrationConfig::default(),
            fixture: None,
            entry_id: "default".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(include) = std::env::var("QUASAR_INCLUDE") {
            config.integration = IntegrationConfig::new(split_list(&include));
        }
        if let Ok(path) = std::env::var("QUASAR_FIXTURE") {
            config.fixture = Some(PathBuf::from(path));
        }
        if let Ok(entry_id) = std::env::var("QUASAR_ENTRY_ID")
            && !entry_id.trim().is_empty()
        {
            config.entry_id = entry_id.trim().to_string();
        }

        config
    }
}

/// Split a comma-separated list, dropping empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
