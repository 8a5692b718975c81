//! Shared configuration for netsandbox tools.
//!
//! TOML file at the platform config directory, layered over built-in
//! defaults and under `NETSANDBOX_` environment variables. Holds output
//! preferences, sandbox defaults (router model, guest network), and named
//! store presets feeding the capacity planner.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netsandbox_core::{DeviceType, PlanRequest, WirelessConfig};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `NETSANDBOX_SANDBOX__ROUTER=router_pro`.
pub const ENV_PREFIX: &str = "NETSANDBOX_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown store preset '{name}'")]
    UnknownStore { name: String, available: Vec<String> },

    #[error("no store preset selected and no default_store configured")]
    NoStore,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Store preset used when none is named on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_store: Option<String>,

    /// Output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Defaults for newly built sandboxes.
    #[serde(default)]
    pub sandbox: SandboxDefaults,

    /// Named store presets.
    #[serde(default)]
    pub stores: BTreeMap<String, StorePreset>,
}

impl Config {
    /// Look up a preset by name, falling back to `default_store`.
    pub fn resolve_store(&self, name: Option<&str>) -> Result<(&str, &StorePreset), ConfigError> {
        let name = name
            .or(self.default_store.as_deref())
            .ok_or(ConfigError::NoStore)?;
        self.stores
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownStore {
                name: name.to_owned(),
                available: self.stores.keys().cloned().collect(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SandboxDefaults {
    /// Router model for synthesized stores.
    #[serde(default = "default_router")]
    pub router: DeviceType,

    /// Guest network hosted by generated access points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_ssid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_password: Option<String>,
}

impl Default for SandboxDefaults {
    fn default() -> Self {
        Self {
            router: default_router(),
            guest_ssid: None,
            guest_password: None,
        }
    }
}

impl SandboxDefaults {
    /// Configured guest network, if an SSID is set.
    pub fn guest_network(&self) -> Option<WirelessConfig> {
        let ssid = self.guest_ssid.as_deref().filter(|s| !s.is_empty())?;
        Some(WirelessConfig::new(
            ssid,
            self.guest_password.clone().unwrap_or_default(),
        ))
    }
}

fn default_router() -> DeviceType {
    DeviceType::Router
}

/// A named store layout for the capacity planner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorePreset {
    #[serde(flatten)]
    pub counts: PlanRequest,

    /// Overrides `sandbox.router` for this store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<DeviceType>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netsandbox", "netsandbox").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netsandbox");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file contributes nothing.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    const SAMPLE: &str = r#"
default_store = "cafe"

[defaults]
output = "json"

[sandbox]
router = "router_pro"
guest_ssid = "CakeGuest"
guest_password = "1234"

[stores.cafe]
pos = 3
printers = 1
handhelds = 2

[stores.flagship]
pos = 12
kds = 4
router = "wifi_router"
"#;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.sandbox.router, DeviceType::Router);
        assert!(cfg.stores.is_empty());
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.sandbox.router, DeviceType::RouterPro);
        assert_eq!(
            cfg.sandbox.guest_network(),
            Some(WirelessConfig::new("CakeGuest", "1234"))
        );

        let (name, cafe) = cfg.resolve_store(None).unwrap();
        assert_eq!(name, "cafe");
        assert_eq!(cafe.counts.pos, 3);
        assert_eq!(cafe.counts.kds, 0);
        assert_eq!(cfg.stores["flagship"].router, Some(DeviceType::WifiRouter));
    }

    #[test]
    fn unknown_store_lists_alternatives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = load_config_from(&path).unwrap();

        let err = cfg.resolve_store(Some("kiosk")).unwrap_err();
        match err {
            ConfigError::UnknownStore { available, .. } => {
                assert_eq!(available, vec!["cafe".to_owned(), "flagship".to_owned()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            Config::default().resolve_store(None),
            Err(ConfigError::NoStore)
        ));
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("NETSANDBOX_DEFAULT_STORE", "flagship");
            jail.set_env("NETSANDBOX_SANDBOX__ROUTER", "router");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_store.as_deref(), Some("flagship"));
            assert_eq!(cfg.sandbox.router, DeviceType::Router);
            Ok(())
        });
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.default_store = Some("cafe".into());
        cfg.stores.insert(
            "cafe".into(),
            StorePreset {
                counts: PlanRequest {
                    pos: 2,
                    printers: 1,
                    kds: 1,
                    handhelds: 0,
                },
                router: None,
            },
        );

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}
