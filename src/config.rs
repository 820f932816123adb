use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::BridgeError;

/// Namespace shared by ability names and the legacy REST routes.
pub const PLUGIN_NAMESPACE: &str = "wcnpl-abilities-demo";

/// Schema version written to the `options` table after initialization.
pub const DB_VERSION: &str = "1.0.0";

/// REST prefix of the capability (abilities) API.
pub const ABILITIES_API_PREFIX: &str = "/wp-json/wp-abilities/v1";

/// REST prefix of the legacy fallback routes.
pub const LEGACY_API_PREFIX: &str = "/wp-json/wcnpl-abilities-demo/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Administrator login; both this and `admin_app_password` must be set
    /// for any caller to reach the administrative tier.
    pub admin_username: Option<String>,
    pub admin_app_password: Option<String>,
    /// When false the abilities routes are not mounted, emulating a host
    /// without capability support.
    pub abilities_api: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:forms.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            admin_username: None,
            admin_app_password: None,
            abilities_api: true,
        }
    }
}

impl Config {
    /// Defaults overlaid with `FORMS_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("FORMS_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid FORMS_* configuration"));

/// Settings consumed by the bridge process, read from `WP_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Target service root without trailing slashes.
    pub base_url: String,
    pub username: Option<String>,
    pub app_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBridgeConfig {
    base_url: Option<String>,
    username: Option<String>,
    app_password: Option<String>,
}

impl BridgeConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            username: None,
            app_password: None,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.app_password = Some(app_password.into());
        self
    }

    /// `WP_BASE_URL` (required), `WP_USERNAME`, `WP_APP_PASSWORD`.
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_figment(Figment::new().merge(Env::prefixed("WP_")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, BridgeError> {
        let raw: RawBridgeConfig = figment.extract()?;
        let base_url = raw
            .base_url
            .filter(|u| !u.is_empty())
            .ok_or(BridgeError::MissingEnv("WP_BASE_URL"))?;
        Ok(Self {
            username: raw.username.filter(|u| !u.is_empty()),
            app_password: raw.app_password.filter(|p| !p.is_empty()),
            ..Self::new(base_url)
        })
    }
}
