//! Configuration loading and root folder resolution
//!
//! Every module reads an optional TOML file (`~/.config/polemark/<module>.toml`
//! unless a path is given explicitly). A missing file is not an error: the
//! module logs a warning and runs on compiled defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::geo::{DuplicateCheckRadius, FieldVerificationRadius};
use crate::{Error, Result};

/// Primary root folder override
pub const ROOT_FOLDER_ENV: &str = "POLEMARK_ROOT_FOLDER";

/// Alternative root folder override, consulted after [`ROOT_FOLDER_ENV`]
pub const ROOT_ENV: &str = "POLEMARK_ROOT";

const APP_DIR_NAME: &str = "polemark";

/// Built-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\polemark
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\polemark"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/polemark
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/polemark"))
    } else {
        // ~/.local/share/polemark
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./polemark_data"))
    }
}

/// Module TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder (device-local state lives here)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP port override; each module has its own compiled default
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub registration: RegistrationConfig,

    #[serde(default)]
    pub nearby: NearbyConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error); `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Registration flow tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Search radius for existing poles at registration time
    #[serde(default)]
    pub duplicate_check_radius_m: DuplicateCheckRadius,

    /// On-site verification radius (not used for duplicate checks)
    #[serde(default)]
    pub field_verification_radius_m: FieldVerificationRadius,

    /// Offsets offered in continuous mode; the first is the primary suggestion
    #[serde(default = "default_prediction_offsets")]
    pub prediction_offsets: Vec<i64>,

    /// Upper bound on uploaded photo size
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            duplicate_check_radius_m: DuplicateCheckRadius::default(),
            field_verification_radius_m: FieldVerificationRadius::default(),
            prediction_offsets: default_prediction_offsets(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

/// External query-by-radius service holding registered poles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyConfig {
    /// Base URL; proximity lookups are skipped when unset
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_nearby_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_nearby_timeout_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_prediction_offsets() -> Vec<i64> {
    vec![1, -1, 2, 3]
}

fn default_max_image_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_nearby_timeout_ms() -> u64 {
    5000
}

impl TomlConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the module's configuration.
    ///
    /// An explicit path must exist. The default per-user path may be absent,
    /// in which case compiled defaults are used.
    pub fn load_for_module(module_name: &str, explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
            })?;
            info!("Loaded configuration from {}", path.display());
            return Self::from_toml_str(&content);
        }

        match config_file_path(module_name) {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&content)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using compiled defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.registration.max_image_bytes == 0 {
            return Err(Error::Config(
                "registration.max_image_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(url) = &self.nearby.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "nearby.url must be an http(s) URL, got {:?}",
                    url
                )));
            }
        }
        Ok(())
    }
}

/// Default per-user config file for a module
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(format!("{}.toml", module_name)))
}

/// Root folder resolution in priority order:
/// 1. Command-line argument
/// 2. `POLEMARK_ROOT_FOLDER`, then `POLEMARK_ROOT`
/// 3. TOML `root_folder`
/// 4. OS-dependent compiled default
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!(module = %self.module_name, "Root folder from command line");
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    info!(module = %self.module_name, "Root folder from {}", var);
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            info!(module = %self.module_name, "Root folder from TOML config");
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder {}", self.root_folder.display());
        }
        Ok(())
    }

    /// Location of the device-local session document
    pub fn session_path(&self) -> PathBuf {
        self.root_folder.join(crate::session::SESSION_FILE_NAME)
    }
}
