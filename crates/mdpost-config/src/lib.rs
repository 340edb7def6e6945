//! Configuration management for mdpost.
//!
//! Parses `mdpost.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `blog.name`
//! - `media.remote.host`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override posts source directory.
    pub source_dir: Option<PathBuf>,
    /// Override attachment directory.
    pub attachment_dir: Option<PathBuf>,
    /// Override media strategy.
    pub strategy: Option<StrategyKind>,
    /// Override blank line preservation.
    pub preserve_blank_lines: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpost.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blog identity.
    pub blog: BlogConfig,
    /// Posts configuration (paths are relative strings from TOML).
    #[serde(default)]
    posts: PostsConfigRaw,
    /// Media resolution configuration.
    pub media: MediaConfig,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved posts configuration (set after loading).
    #[serde(skip)]
    pub posts_resolved: PostsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Blog identity.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BlogConfig {
    /// Blog name, used by publish adapters and reporting.
    pub name: Option<String>,
}

/// Raw posts configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PostsConfigRaw {
    source_dir: Option<String>,
    attachment_dir: Option<String>,
}

/// Resolved posts configuration with absolute paths.
#[derive(Debug, Default)]
pub struct PostsConfig {
    /// Directory containing markdown posts.
    pub source_dir: PathBuf,
    /// Extra directory searched for attachment-style references.
    pub attachment_dir: Option<PathBuf>,
    /// Project root used for remote-rewrite relative paths.
    pub project_root: PathBuf,
}

/// Media strategy selector as written in TOML or on the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Strip local media references.
    Drop,
    /// Rewrite local files to URLs under `media.remote`.
    Remote,
    /// Emit placeholder tokens for a later upload step.
    #[default]
    Upload,
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "remote" => Ok(Self::Remote),
            "upload" => Ok(Self::Upload),
            other => Err(format!(
                "unknown strategy '{other}' (expected drop, remote or upload)"
            )),
        }
    }
}

/// Media resolution configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MediaConfig {
    /// Resolution strategy.
    pub strategy: StrategyKind,
    /// Remote base, required when `strategy = "remote"`.
    pub remote: Option<RemoteConfig>,
}

/// Remote base URL components for the remote strategy.
#[derive(Debug, Deserialize)]
pub struct RemoteConfig {
    /// Host including scheme, e.g. `https://raw.githubusercontent.com`.
    pub host: String,
    /// Repository owner.
    pub user: String,
    /// Repository name.
    pub repo: String,
    /// Branch name.
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_owned()
}

impl RemoteConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has
    /// an invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.host, "media.remote.host")?;
        require_http_url(&self.host, "media.remote.host")?;
        require_non_empty(&self.user, "media.remote.user")?;
        require_non_empty(&self.repo, "media.remote.repo")?;
        require_non_empty(&self.branch, "media.remote.branch")?;
        Ok(())
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Keep blank source lines as blank output lines.
    pub preserve_blank_lines: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`media.remote.host`").
        field: String,
        /// Error message (e.g., "${`REMOTE_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpost.toml` in current directory and
    /// parents.
    ///
    /// CLI settings are applied after loading and path resolution,
    /// allowing CLI arguments to take precedence over config file
    /// values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.posts_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(attachment_dir) = &settings.attachment_dir {
            self.posts_resolved.attachment_dir = Some(attachment_dir.clone());
        }
        if let Some(strategy) = settings.strategy {
            self.media.strategy = strategy;
        }
        if let Some(preserve) = settings.preserve_blank_lines {
            self.render.preserve_blank_lines = preserve;
        }
    }

    /// Get the validated remote base configuration.
    ///
    /// Use this instead of accessing `media.remote` directly when the
    /// remote strategy is selected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or
    /// invalid.
    pub fn require_remote(&self) -> Result<&RemoteConfig, ConfigError> {
        let remote = self.media.remote.as_ref().ok_or_else(|| {
            ConfigError::Validation(
                "[media.remote] section required for strategy = \"remote\"".into(),
            )
        })?;
        remote.validate()?;
        Ok(remote)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            blog: BlogConfig::default(),
            posts: PostsConfigRaw::default(),
            media: MediaConfig::default(),
            render: RenderConfig::default(),
            posts_resolved: PostsConfig {
                source_dir: base.join("posts"),
                attachment_dir: None,
                project_root: base.to_path_buf(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. The remote
    /// section is only validated eagerly when the remote strategy is
    /// selected; [`require_remote`](Self::require_remote) validates it
    /// on demand otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.blog.name {
            require_non_empty(name, "blog.name")?;
        }
        if self.media.strategy == StrategyKind::Remote {
            self.require_remote()?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(name) = &self.blog.name {
            self.blog.name = Some(expand::expand_env(name, "blog.name")?);
        }
        if let Some(remote) = &mut self.media.remote {
            remote.host = expand::expand_env(&remote.host, "media.remote.host")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.posts_resolved = PostsConfig {
            source_dir: config_dir.join(self.posts.source_dir.as_deref().unwrap_or("posts")),
            attachment_dir: self
                .posts
                .attachment_dir
                .as_deref()
                .map(|dir| config_dir.join(dir)),
            project_root: config_dir.to_path_buf(),
        };
    }
}
