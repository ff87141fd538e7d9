//! Configuration management for MarkPress.
//!
//! Parses `markpress.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.root_dir` (also expands a leading `~`)
//! - `site.root_path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "markpress.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Markdown extension configuration.
    pub markdown: MarkdownConfig,
    /// Head fragment configuration.
    pub head: HeadConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root_dir: Option<String>,
    root_path: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory of markdown files to serve.
    pub root_dir: PathBuf,
    /// URL prefix for all routes (`None` mounts at `/`).
    pub root_path: Option<String>,
}

/// Markdown extension configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownConfig {
    /// Pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// Task list items.
    pub tasklists: bool,
    /// Footnotes.
    pub footnotes: bool,
    /// Smart quotes and dashes.
    pub smart_punctuation: bool,
    /// Heading `{#id .class}` attributes.
    pub heading_attributes: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: false,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

/// Head fragment configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadConfig {
    /// Title used when the root index has no `config.siteName`.
    pub default_title: String,
    /// HTML-escape frontmatter values in the head fragment.
    pub escape: bool,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            default_title: "MarkPress".to_owned(),
            escape: true,
        }
    }
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
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
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

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `markpress.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Create a configuration that serves `root_dir` with all other values
    /// at their defaults.
    #[must_use]
    pub fn for_root_dir(root_dir: impl Into<PathBuf>, root_path: Option<&str>) -> Self {
        let mut config = Self::default();
        config.site_resolved = SiteConfig {
            root_dir: root_dir.into(),
            root_path: root_path.map(str::to_owned),
        };
        config
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
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            markdown: MarkdownConfig::default(),
            head: HeadConfig::default(),
            site_resolved: SiteConfig {
                root_dir: base.join("docs"),
                root_path: None,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        require_non_empty(&self.head.default_title, "head.default_title")?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if let Some(root_path) = &self.site_resolved.root_path {
            if !root_path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "site.root_path must start with '/', got {root_path:?}"
                )));
            }
            if root_path.contains(['{', '}', '*']) {
                return Err(ConfigError::Validation(
                    "site.root_path cannot contain route captures".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref dir) = self.site.root_dir {
            self.site.root_dir = Some(expand::expand_path(dir, "site.root_dir")?);
        }
        if let Some(ref prefix) = self.site.root_path {
            self.site.root_path = Some(expand::expand_env(prefix, "site.root_path")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            root_dir: config_dir.join(self.site.root_dir.as_deref().unwrap_or("docs")),
            root_path: self.site.root_path.clone().filter(|p| !p.is_empty()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.site_resolved.root_dir, PathBuf::from("/test/docs"));
        assert!(config.site_resolved.root_path.is_none());
        assert_eq!(config.markdown, MarkdownConfig::default());
        assert_eq!(config.head.default_title, "MarkPress");
        assert!(config.head.escape);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert!(config.markdown.tables);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[site]
root_dir = "content"
root_path = "/docs"

[markdown]
tables = false
footnotes = true

[head]
default_title = "Handbook"
escape = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.site_resolved.root_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(config.site_resolved.root_path.as_deref(), Some("/docs"));
        assert!(!config.markdown.tables);
        assert!(config.markdown.footnotes);
        assert!(config.markdown.strikethrough);
        assert_eq!(
            config.head,
            HeadConfig {
                default_title: "Handbook".to_owned(),
                escape: false,
            }
        );
    }

    #[test]
    fn test_empty_root_path_is_unset() {
        let toml = r#"
[site]
root_path = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(config.site_resolved.root_path.is_none());
        assert_eq!(config.site_resolved.root_dir, PathBuf::from("/project/docs"));
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_root_path_needs_leading_slash() {
        let config = Config::for_root_dir("/srv/docs", Some("docs"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.root_path"));
    }

    #[test]
    fn test_validate_root_path_rejects_captures() {
        let config = Config::for_root_dir("/srv/docs", Some("/{page}"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_root_dir() {
        let config = Config::for_root_dir("/srv/docs", Some("/handbook"));

        assert_eq!(config.site_resolved.root_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.site_resolved.root_path.as_deref(), Some("/handbook"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[site]\nroot_dir = \"pages\"\nroot_path = \"/${MARKPRESS_TEST_UNSET_PREFIX:-guide}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.site_resolved.root_dir, temp_dir.path().join("pages"));
        assert_eq!(config.site_resolved.root_path.as_deref(), Some("/guide"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/markpress.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Validation(_))
        ));
    }
}
