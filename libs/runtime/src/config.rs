use anyhow::{Context, Result};
use panel::config::PanelConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration with strongly-typed sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base directory for the store and log files; normalized to an
    /// absolute path and created at load time. Empty means the platform
    /// default (`$HOME/.seedboard`).
    #[serde(default)]
    pub home_dir: String,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Panel module configuration.
    #[serde(default)]
    pub panel: PanelConfig,
}

/// Logging settings: console level plus an optional rotating file sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub console_level: String, // "trace", "debug", "info", "warn", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/seedboard.log"; empty disables the file sink
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many rotated files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file: "logs/seedboard.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            logging: Some(LoggingConfig::default()),
            panel: PanelConfig::default(),
        }
    }
}

/// CLI arguments passed down to configuration loading.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file →
    /// environment variables. Also normalizes `home_dir` into an absolute
    /// path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // For layered loading, start from a minimal base where optional
        // sections are None, so they remain None unless explicitly provided
        // by YAML/ENV.
        let base = AppConfig {
            home_dir: String::new(),
            logging: None,
            panel: PanelConfig::default(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: SEEDBOARD__PANEL__STORAGE_DIR=/tmp/s maps to panel.storage_dir
            .merge(Env::prefixed("SEEDBOARD__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        normalize_home_dir_inplace(&mut config).context("Failed to resolve home_dir")?;
        Ok(config)
    }

    /// Load configuration from file or create with default values.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut config = Self::default();
                normalize_home_dir_inplace(&mut config).context("Failed to resolve home_dir")?;
                Ok(config)
            }
        }
    }

    /// Apply CLI overrides (verbosity) on top of the loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if args.verbose > 0 {
            let level = if args.verbose == 1 { "debug" } else { "trace" };
            let logging = self.logging.get_or_insert_with(LoggingConfig::default);
            logging.console_level = level.to_string();
        }
    }

    /// Resolved store directory: relative paths land under the home dir.
    pub fn storage_path(&self) -> PathBuf {
        let dir = Path::new(&self.panel.storage_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            Path::new(&self.home_dir).join(dir)
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }
}

/// Resolve `home_dir` into an absolute path, create it, and write it back
/// with normalized slashes (important on Windows).
fn normalize_home_dir_inplace(config: &mut AppConfig) -> Result<()> {
    let resolved = resolve_home_dir(&config.home_dir)?;
    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("Failed to create home dir {}", resolved.display()))?;
    config.home_dir = resolved.to_string_lossy().replace('\\', "/");
    Ok(())
}

fn resolve_home_dir(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(user_home()?.join(".seedboard"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return Ok(user_home()?.join(rest));
    }
    let path = PathBuf::from(trimmed);
    if path.is_relative() {
        let cwd = std::env::current_dir().context("Failed to read current dir")?;
        Ok(cwd.join(path))
    } else {
        Ok(path)
    }
}

fn user_home() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .context("Neither HOME nor USERPROFILE is set")
}
