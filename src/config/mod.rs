use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// YAML configuration stored in `rbenefits.conf`.
///
/// The `default_*` slot values are used by `settings set` for any value the
/// operator leaves out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_source")]
    pub booking_source: String,
    #[serde(default = "default_period")]
    pub default_period: String,
    #[serde(default = "default_capacity")]
    pub default_capacity: i64,
    #[serde(default = "default_slot_minutes")]
    pub default_slot_minutes: i64,
    #[serde(default = "default_open")]
    pub default_open: String,
    #[serde(default = "default_close")]
    pub default_close: String,
    #[serde(default = "default_days")]
    pub default_days: String,
}

fn default_branch() -> String {
    "main".to_string()
}
fn default_source() -> String {
    "cli".to_string()
}
fn default_period() -> String {
    "month".to_string()
}
fn default_capacity() -> i64 {
    6
}
fn default_slot_minutes() -> i64 {
    60
}
fn default_open() -> String {
    "07:00".to_string()
}
fn default_close() -> String {
    "21:00".to_string()
}
fn default_days() -> String {
    "all".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_branch: default_branch(),
            booking_source: default_source(),
            default_period: default_period(),
            default_capacity: default_capacity(),
            default_slot_minutes: default_slot_minutes(),
            default_open: default_open(),
            default_close: default_close(),
            default_days: default_days(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rbenefits")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rbenefits")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rbenefits.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rbenefits.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    /// Resolve a user-supplied database name: absolute paths and `~/` are kept,
    /// bare names land in the config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Create the config directory, the config file (unless `is_test`) and an
    /// empty database file. Returns the configuration that was written.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let db_path = match custom_db {
            Some(name) if is_test => PathBuf::from(name),
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
