//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hierarchy/hierarchy.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `HIERARCHY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::HierarchyOptions;

/// Prefix of environment variable overrides, e.g. `HIERARCHY_SET_PARENT_LINKS=true`.
pub const ENV_PREFIX: &str = "HIERARCHY";

/// Get the XDG config directory for hierarchy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hierarchy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hierarchy.toml"))
}

impl HierarchyOptions {
    /// Load options with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_from(global_config_path().as_deref(), config_file, ENV_PREFIX)
    }

    /// Load options from explicit sources.
    ///
    /// `global` is optional even when given (a missing file is skipped);
    /// `config_file` is required when given.
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
        env_prefix: &str,
    ) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("set_parent_links", defaults.set_parent_links)
            .map_err(config_err)?
            .set_default("strategy", "indexed")
            .map_err(config_err)?;

        // 2. Global config
        if let Some(global_path) = global {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        // 4. Environment variables
        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let options: Self = config.try_deserialize().map_err(config_err)?;
        debug!("loaded options: {:?}", options);
        Ok(options)
    }

    /// Serialize options to TOML string.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }

    /// Generate a template config file with comments.
    pub fn template() -> String {
        r#"# hierarchy configuration
# Location: ~/.config/hierarchy/hierarchy.toml (global)
#       or: any file passed with --config
# Every key can be overridden with HIERARCHY_<KEY>, e.g. HIERARCHY_SET_PARENT_LINKS=true

# Populate child-to-parent back-references during build.
# Needed for ancestor lookups and selection marking.
# Leave off when the built tree is handed to a serializer.
set_parent_links = false

# Child lookup: "indexed" (linear) or "scan" (quadratic, rescans the input per node)
strategy = "indexed"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
