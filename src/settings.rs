//! Site-wide configuration management.
//!
//! Job-independent settings (solver commands, file extensions, default
//! memory, logging level) live in INI-format configuration files loaded with
//! the following precedence:
//!
//! 1. Local configuration (`./mpconv_config.cfg`)
//! 2. User configuration (`~/.config/mpconv/mpconv_config.cfg`)
//! 3. System configuration (`/etc/mpconv/mpconv_config.cfg`)
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```ini
//! [commands]
//! psi4 = psi4
//!
//! [extensions]
//! psi4 = out
//! custom = log
//!
//! [general]
//! max_memory = 2GB
//!
//! [logging]
//! level = info
//! ```

use crate::config::SolverProgram;
use configparser::ini::Ini;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during settings loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// All site-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Solver executable commands keyed by program name
    pub commands: CommandSettings,
    /// Solver file extensions keyed by program name
    pub extensions: ExtensionSettings,
    /// General program settings
    pub general: GeneralSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Solver executable commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSettings {
    /// Psi4 command (default: "psi4")
    pub psi4: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            psi4: "psi4".to_string(),
        }
    }
}

/// Solver file extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionSettings {
    /// Psi4 input deck extension (default: "dat")
    pub psi4_input: String,
    /// Psi4 output file extension (default: "out")
    pub psi4: String,
    /// Custom solver output extension (default: "log")
    pub custom: String,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            psi4_input: "dat".to_string(),
            psi4: "out".to_string(),
            custom: "log".to_string(),
        }
    }
}

/// General program settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Default memory allocation when the input file omits `mem`
    pub max_memory: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            max_memory: "2GB".to_string(),
        }
    }
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (default: "info")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Loads and serves site-wide settings.
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the available configuration files, lowest
    /// precedence first so later files override earlier ones.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let mut candidates: Vec<(PathBuf, &str)> = Vec::new();
        if let Some(system_path) = Self::system_config_path() {
            candidates.push((system_path, "system config"));
        }
        if let Some(user_path) = Self::user_config_path() {
            candidates.push((user_path, "user config"));
        }
        candidates.push((PathBuf::from("mpconv_config.cfg"), "local config"));

        for (path, kind) in candidates {
            if !path.exists() {
                continue;
            }
            match Self::apply_config(&path, &mut settings) {
                Ok(()) => {
                    config_source = format!("{} ({})", kind, path.display());
                    debug!("Loaded {} from: {}", kind, path.display());
                }
                Err(e) => {
                    warn!("Failed to load {} from {}: {}", kind, path.display(), e);
                }
            }
        }

        info!("Configuration loaded from: {}", config_source);
        Ok(Self {
            settings,
            config_source,
        })
    }

    /// Returns a manager holding built-in defaults without touching the
    /// filesystem.
    pub fn defaults() -> Self {
        Self {
            settings: Settings::default(),
            config_source: "built-in defaults".to_string(),
        }
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// Gets a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the configured command for a solver program.
    pub fn command_for(&self, program: SolverProgram) -> &str {
        match program {
            SolverProgram::Psi4 => &self.settings.commands.psi4,
            // Custom commands come from the interface JSON; this is only a
            // fallback for display.
            SolverProgram::Custom => "custom",
        }
    }

    /// Returns the input deck extension for a solver program.
    pub fn input_extension(&self, program: SolverProgram) -> &str {
        match program {
            SolverProgram::Psi4 => &self.settings.extensions.psi4_input,
            SolverProgram::Custom => "inp",
        }
    }

    /// Returns the output file extension for a solver program.
    pub fn output_extension(&self, program: SolverProgram) -> &str {
        match program {
            SolverProgram::Psi4 => &self.settings.extensions.psi4,
            SolverProgram::Custom => &self.settings.extensions.custom,
        }
    }

    /// Applies one INI file's keys onto the accumulated settings.
    fn apply_config(path: &Path, settings: &mut Settings) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        if let Some(commands) = ini.get_map_ref().get("commands") {
            if let Some(Some(psi4)) = commands.get("psi4") {
                settings.commands.psi4 = psi4.clone();
            }
        }
        if let Some(extensions) = ini.get_map_ref().get("extensions") {
            if let Some(Some(psi4_input)) = extensions.get("psi4_input") {
                settings.extensions.psi4_input = psi4_input.clone();
            }
            if let Some(Some(psi4)) = extensions.get("psi4") {
                settings.extensions.psi4 = psi4.clone();
            }
            if let Some(Some(custom)) = extensions.get("custom") {
                settings.extensions.custom = custom.clone();
            }
        }
        if let Some(general) = ini.get_map_ref().get("general") {
            if let Some(Some(max_memory)) = general.get("max_memory") {
                settings.general.max_memory = max_memory.clone();
            }
        }
        if let Some(logging) = ini.get_map_ref().get("logging") {
            if let Some(Some(level)) = logging.get("level") {
                Self::validate_log_level(level)?;
                settings.logging.level = level.clone();
            }
        }

        Ok(())
    }

    fn validate_log_level(level: &str) -> Result<(), ConfigError> {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid log level: {}",
                other
            ))),
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("mpconv")
                .join("mpconv_config.cfg")
        })
    }

    fn system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/mpconv/mpconv_config.cfg"))
        }
        #[cfg(not(unix))]
        {
            None
        }
    }
}

/// Writes a commented settings template to `mpconv_config.cfg` in the
/// current directory.
pub fn create_settings_template() -> Result<PathBuf, ConfigError> {
    let template = "\
# mpconv site configuration
# Precedence: ./mpconv_config.cfg, ~/.config/mpconv/mpconv_config.cfg,
# /etc/mpconv/mpconv_config.cfg, built-in defaults.

[commands]
# Solver executable (absolute path or something on PATH)
psi4 = psi4

[extensions]
# Solver input/output file extensions
psi4_input = dat
psi4 = out
custom = log

[general]
# Default memory allocation when the input file omits mem
max_memory = 2GB

[logging]
# error | warn | info | debug | trace
level = info
";
    let path = PathBuf::from("mpconv_config.cfg");
    fs::write(&path, template)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let manager = SettingsManager::defaults();
        assert_eq!(manager.command_for(SolverProgram::Psi4), "psi4");
        assert_eq!(manager.input_extension(SolverProgram::Psi4), "dat");
        assert_eq!(manager.output_extension(SolverProgram::Psi4), "out");
        assert_eq!(manager.output_extension(SolverProgram::Custom), "log");
        assert_eq!(manager.config_source(), "built-in defaults");
    }

    #[test]
    fn test_log_level_validation() {
        assert!(SettingsManager::validate_log_level("debug").is_ok());
        assert!(SettingsManager::validate_log_level("loud").is_err());
    }
}
