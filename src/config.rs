//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/condtree/condtree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `CONDTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Response codes the backend uses for "not logged in as admin / streamer / viewer".
pub const DEFAULT_UNAUTHENTICATED_CODES: [i64; 3] = [114514, 1919, 810];

/// Unified configuration for condtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    /// Where the session guard sends the user when the backend rejects the session
    pub login_path: String,
    /// Raw `Cookie` header value carrying the admin session
    pub session_cookie: Option<String>,
    /// File holding the cookie value (used when `session_cookie` is unset)
    pub cookie_file: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Envelope codes that mean the session is missing or expired
    pub unauthenticated_codes: Vec<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            login_path: "/".into(),
            session_cookie: None,
            cookie_file: None,
            timeout_secs: 10,
            unauthenticated_codes: DEFAULT_UNAUTHENTICATED_CODES.to_vec(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_url: Option<String>,
    pub login_path: Option<String>,
    pub session_cookie: Option<String>,
    pub cookie_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub unauthenticated_codes: Option<Vec<i64>>,
}

/// Get the XDG config directory for condtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "condtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("condtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Union of two code lists, sorted and de-duplicated.
pub fn merge_codes(base: &[i64], overlay: &[i64]) -> Vec<i64> {
    let mut merged: Vec<i64> = base.iter().chain(overlay).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

impl Settings {
    /// Load settings from all sources.
    ///
    /// The global file replaces defaults, including the code list. A local
    /// file overrides scalars but adds to the inherited code list, so a
    /// project cannot accidentally drop a sentinel code. Environment
    /// variables replace everything.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply global config onto defaults with REPLACE semantics for the code list.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let mut next = self.merge_scalars(global);
        if let Some(codes) = &global.unauthenticated_codes {
            next.unauthenticated_codes = codes.clone();
        }
        next
    }

    /// Merge overlay config onto self with UNION semantics for the code list.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut next = self.merge_scalars(overlay);
        if let Some(codes) = &overlay.unauthenticated_codes {
            next.unauthenticated_codes = merge_codes(&self.unauthenticated_codes, codes);
        }
        next
    }

    fn merge_scalars(&self, overlay: &RawSettings) -> Self {
        Self {
            base_url: overlay
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            login_path: overlay
                .login_path
                .clone()
                .unwrap_or_else(|| self.login_path.clone()),
            session_cookie: overlay
                .session_cookie
                .clone()
                .or_else(|| self.session_cookie.clone()),
            cookie_file: overlay
                .cookie_file
                .clone()
                .or_else(|| self.cookie_file.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            unauthenticated_codes: self.unauthenticated_codes.clone(),
        }
    }

    /// Apply CONDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("CONDTREE")
                .prefix_separator("_")
                .list_separator(",")
                .with_list_parse_key("unauthenticated_codes"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("base_url") {
            settings.base_url = val;
        }
        if let Ok(val) = config.get_string("login_path") {
            settings.login_path = val;
        }
        if let Ok(val) = config.get_string("session_cookie") {
            settings.session_cookie = Some(val);
        }
        if let Ok(val) = config.get_string("cookie_file") {
            settings.cookie_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("timeout_secs") {
            settings.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("timeout_secs must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get::<Vec<i64>>("unauthenticated_codes") {
            settings.unauthenticated_codes = val;
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.cookie_file {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.cookie_file = Some(PathBuf::from(expanded));
        }
    }

    /// Cookie to send with every request, from `session_cookie` or `cookie_file`.
    pub fn session_cookie_value(&self) -> Result<Option<String>, ApplicationError> {
        if let Some(cookie) = &self.session_cookie {
            return Ok(Some(cookie.clone()));
        }
        let Some(path) = &self.cookie_file else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
            message: format!("read cookie file {}: {}", path.display(), e),
        })?;
        let cookie = content.trim();
        Ok((!cookie.is_empty()).then(|| cookie.to_string()))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# condtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/condtree/condtree.toml
#   Local:  file given with --config
#   Env:    CONDTREE_* environment variables (explicit overrides)
#
# unauthenticated_codes: global config REPLACES the defaults, local config
# ADDS to whatever it inherits.

# Backend base URL
# base_url = "http://127.0.0.1:8080"

# Login page shown when the backend rejects the session
# login_path = "/"

# Session cookie, either inline or from a file
# session_cookie = "session=..."
# cookie_file = "~/.config/condtree/cookie"

# Request timeout in seconds
# timeout_secs = 10

# Response codes meaning "session missing or expired"
# unauthenticated_codes = [114514, 1919, 810]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
