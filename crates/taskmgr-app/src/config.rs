use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskmgr_core::UserId;
use taskmgr_core::form::cover_thumbnails;

const CONFIG_DIR: &str = ".taskmgr";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding [`ClientConfig::base_uri`].
pub const ENV_BASE_URI: &str = "TASKMGR_BASE_URI";
/// Environment variable overriding [`ClientConfig::user_id`].
pub const ENV_USER_ID: &str = "TASKMGR_USER_ID";

/// Client configuration loaded from `.taskmgr/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST backend.
    pub base_uri: String,
    /// Per-request timeout; unset means requests may wait forever.
    pub request_timeout_secs: Option<u64>,
    /// Signed-in user, if known.
    pub user_id: Option<UserId>,
    /// Undelivered actions per listener above which a warning is logged.
    pub backlog_warning: usize,
    /// Stock cover images offered by the project form.
    pub covers: CoverConfig,
}

/// Where the stock cover images live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Base path the `covers/` directory hangs off.
    pub base: String,
    /// Number of stock covers.
    pub count: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:3000".into(),
            request_timeout_secs: None,
            user_id: None,
            backlog_warning: 256,
            covers: CoverConfig::default(),
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            base: "/assets/img".into(),
            count: 40,
        }
    }
}

impl ClientConfig {
    /// Load `.taskmgr/config.toml` under `dir`, falling back to defaults when absent.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load an explicit configuration file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TASKMGR_*` environment overrides.
    ///
    /// # Errors
    /// Returns an error when an override produces an invalid configuration.
    pub fn with_env(self) -> Result<Self> {
        let mut fetch = |key: &'static str| env::var(key).ok();
        self.with_env_from(&mut fetch)
    }

    fn with_env_from(mut self, fetch: &mut impl FnMut(&'static str) -> Option<String>) -> Result<Self> {
        let mut value = |key| fetch(key).filter(|v| !v.trim().is_empty());
        if let Some(base_uri) = value(ENV_BASE_URI) {
            self.base_uri = base_uri;
        }
        if let Some(user_id) = value(ENV_USER_ID) {
            self.user_id = Some(UserId::new(user_id));
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let uri = self.base_uri.trim();
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            bail!("base_uri must be an http(s) URI, got '{}'", self.base_uri);
        }
        if self.covers.count == 0 {
            bail!("covers.count must be greater than zero");
        }
        if self.backlog_warning == 0 {
            bail!("backlog_warning must be greater than zero");
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Thumbnail paths for the project form.
    #[must_use]
    pub fn thumbnails(&self) -> Vec<String> {
        cover_thumbnails(&self.covers.base, self.covers.count)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> Result<TempDir> {
        let temp = TempDir::new()?;
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(CONFIG_FILE), contents)?;
        Ok(temp)
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let config = ClientConfig::load(temp.path())?;
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), None);
        Ok(())
    }

    #[test]
    fn parses_partial_file() -> Result<()> {
        let temp = write_config(
            r#"
base_uri = "https://api.example.com"
request_timeout_secs = 5
user_id = 7

[covers]
count = 3
"#,
        )?;
        let config = ClientConfig::load(temp.path())?;
        assert_eq!(config.base_uri, "https://api.example.com");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.user_id, Some(UserId::new("7")));
        assert_eq!(config.covers.base, "/assets/img");
        assert_eq!(config.thumbnails().len(), 3);
        Ok(())
    }

    #[test]
    fn rejects_non_http_base_uri() -> Result<()> {
        let temp = write_config("base_uri = \"ftp://example.com\"\n")?;
        let err = ClientConfig::load(temp.path()).expect_err("invalid scheme");
        assert!(err.to_string().contains("base_uri"));
        Ok(())
    }

    #[test]
    fn rejects_zero_covers() -> Result<()> {
        let temp = write_config("[covers]\ncount = 0\n")?;
        assert!(ClientConfig::load(temp.path()).is_err());
        Ok(())
    }

    #[test]
    fn rejects_zero_backlog_warning() -> Result<()> {
        let temp = write_config("backlog_warning = 0\n")?;
        let err = ClientConfig::load(temp.path()).expect_err("zero backlog");
        assert!(err.to_string().contains("backlog_warning"));
        Ok(())
    }

    #[test]
    fn environment_overrides_file_values() -> Result<()> {
        let mut fetch = |key: &'static str| match key {
            ENV_BASE_URI => Some("http://override:4000".into()),
            ENV_USER_ID => Some("  ".into()),
            _ => None,
        };
        let config = ClientConfig::default().with_env_from(&mut fetch)?;
        assert_eq!(config.base_uri, "http://override:4000");
        assert_eq!(config.user_id, None);
        Ok(())
    }
}
