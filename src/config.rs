//! Portal configuration.
//!
//! Loaded from a single `primojobs.toml` (path set with `--config`). The file
//! is sparse: it is merged key-by-key on top of the stock defaults, so it only
//! needs the values it wants to change. Unknown keys are rejected to catch
//! typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! name = "PrimoJobs"
//! tagline = "Premier Job Portal for Career Growth"
//! url = "https://primojobs.com"
//!
//! [http]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [backend]
//! kind = "postgrest"        # or "memory" for offline development
//! url = "https://xyz.supabase.co"
//! anon_key = ""
//! seed_file = "seed.json"   # memory backend only
//! timeout_secs = 10
//!
//! [session]
//! cookie = "sb-access-token"
//!
//! [colors]
//! primary = "#2563eb"
//! ```
//!
//! ## Environment Overrides
//!
//! Applied after the file merge, for secrets that should not live on disk:
//! `PRIMOJOBS_BACKEND_URL`, `PRIMOJOBS_BACKEND_KEY`, `PRIMOJOBS_PORT`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Portal configuration. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding and canonical URL.
    pub site: SiteInfo,
    /// Listener address.
    pub http: HttpConfig,
    /// Where listings and identities come from.
    pub backend: BackendConfig,
    /// How the viewer's credential reaches us.
    pub session: SessionConfig,
    /// Theme colors, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// Stat tiles shown under the home hero.
    pub stats: Vec<StatTile>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            http: HttpConfig::default(),
            backend: BackendConfig::default(),
            session: SessionConfig::default(),
            colors: ColorConfig::default(),
            stats: default_stats(),
        }
    }
}

impl SiteConfig {
    /// Validate values that serde alone can't check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.http.port == 0 {
            return Err(ConfigError::Validation("http.port must be non-zero".into()));
        }
        if self.session.cookie.trim().is_empty() {
            return Err(ConfigError::Validation(
                "session.cookie must not be empty".into(),
            ));
        }
        if self.backend.kind == BackendKind::Postgrest && self.backend.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "backend.url is required for the postgrest backend".into(),
            ));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "backend.timeout_secs must be non-zero".into(),
            ));
        }
        for (key, value) in self.colors.entries() {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "colors.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    pub description: String,
    /// Canonical origin, used for Open Graph tags.
    pub url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "PrimoJobs".to_string(),
            tagline: "Premier Job Portal for Career Growth".to_string(),
            description: "Find your dream job with PrimoJobs. Explore thousands of \
                          opportunities, join career webinars, read industry insights, \
                          and access professional services."
                .to_string(),
            url: "https://primojobs.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted PostgREST + GoTrue over HTTPS.
    Postgrest,
    /// In-process rows, optionally seeded from a JSON file.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Project origin, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public anon key sent as `apikey`.
    pub anon_key: String,
    /// JSON seed for the memory backend: `{"jobs": [...], "webinars": [...]}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            url: String::new(),
            anon_key: String::new(),
            seed_file: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Cookie carrying the viewer's access token.
    pub cookie: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: "sb-access-token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub primary_foreground: String,
    pub background: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
    pub danger: String,
    pub success: String,
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("primary", &self.primary),
            ("primary_foreground", &self.primary_foreground),
            ("background", &self.background),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
            ("border", &self.border),
            ("danger", &self.danger),
            ("success", &self.success),
        ]
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            primary_foreground: "#ffffff".to_string(),
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            text_muted: "#4b5563".to_string(),
            border: "#e5e7eb".to_string(),
            danger: "#dc2626".to_string(),
            success: "#16a34a".to_string(),
        }
    }
}

/// One hero stat tile, e.g. `10,000+` / `Active Jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatTile {
    pub value: String,
    pub label: String,
}

fn default_stats() -> Vec<StatTile> {
    [
        ("10,000+", "Active Jobs"),
        ("5,000+", "Companies"),
        ("50,000+", "Job Seekers"),
        ("95%", "Success Rate"),
    ]
    .into_iter()
    .map(|(value, label)| StatTile {
        value: value.to_string(),
        label: label.to_string(),
    })
    .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays) replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the defaults, then deserialize.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Environment lookups used by [`apply_env_overrides`]; a seam for tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Apply `PRIMOJOBS_*` overrides on top of file values.
pub fn apply_env_overrides(
    config: &mut SiteConfig,
    env: &dyn EnvSource,
) -> Result<(), ConfigError> {
    if let Some(url) = env.get("PRIMOJOBS_BACKEND_URL") {
        info!("backend.url overridden by PRIMOJOBS_BACKEND_URL");
        config.backend.url = url;
    }
    if let Some(key) = env.get("PRIMOJOBS_BACKEND_KEY") {
        info!("backend.anon_key overridden by PRIMOJOBS_BACKEND_KEY");
        config.backend.anon_key = key;
    }
    if let Some(port) = env.get("PRIMOJOBS_PORT") {
        config.http.port = port.trim().parse().map_err(|e| {
            ConfigError::Validation(format!("PRIMOJOBS_PORT={port:?} is not a port: {e}"))
        })?;
        info!(port = config.http.port, "http.port overridden by PRIMOJOBS_PORT");
    }
    Ok(())
}

/// Load config from `path`, merged over stock defaults, with environment
/// overrides applied and the result validated.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_with_env(path, &ProcessEnv)
}

pub fn load_config_with_env(path: &Path, env: &dyn EnvSource) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        info!(path = %path.display(), "no config file, using stock defaults");
    }
    let mut config = resolve_config(base, overlay)?;
    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `primojobs.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# PrimoJobs Configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.
#
# Secrets can come from the environment instead of this file:
#   PRIMOJOBS_BACKEND_URL, PRIMOJOBS_BACKEND_KEY, PRIMOJOBS_PORT

# ---------------------------------------------------------------------------
# Branding
# ---------------------------------------------------------------------------
[site]
name = "PrimoJobs"
tagline = "Premier Job Portal for Career Growth"
description = "Find your dream job with PrimoJobs. Explore thousands of opportunities, join career webinars, read industry insights, and access professional services."
# Canonical origin used in Open Graph tags.
url = "https://primojobs.com"

# ---------------------------------------------------------------------------
# HTTP listener
# ---------------------------------------------------------------------------
[http]
host = "0.0.0.0"
port = 3000

# ---------------------------------------------------------------------------
# Data and identity backend
# ---------------------------------------------------------------------------
[backend]
# "postgrest" talks to the hosted project (REST + auth endpoints).
# "memory" serves rows from seed_file, for offline development.
kind = "memory"
url = ""
anon_key = ""
# seed_file = "seed.json"
timeout_secs = 10

# ---------------------------------------------------------------------------
# Session
# ---------------------------------------------------------------------------
[session]
# Cookie holding the viewer's access token.
cookie = "sb-access-token"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
primary = "#2563eb"
primary_foreground = "#ffffff"
background = "#ffffff"
text = "#111827"
text_muted = "#4b5563"
border = "#e5e7eb"
danger = "#dc2626"
success = "#16a34a"

# ---------------------------------------------------------------------------
# Home page stat tiles (replaces the whole list when set)
# ---------------------------------------------------------------------------
[[stats]]
value = "10,000+"
label = "Active Jobs"

[[stats]]
value = "5,000+"
label = "Companies"

[[stats]]
value = "50,000+"
label = "Job Seekers"

[[stats]]
value = "95%"
label = "Success Rate"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-primary-fg: {primary_fg};
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
    --color-danger: {danger};
    --color-success: {success};
}}"#,
        primary = colors.primary,
        primary_fg = colors.primary_foreground,
        bg = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        border = colors.border,
        danger = colors.danger,
        success = colors.success,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeEnv(HashMap<&'static str, &'static str>);

    impl EnvSource for FakeEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn no_env() -> FakeEnv {
        FakeEnv(HashMap::new())
    }

    #[test]
    fn stock_config_has_branding_and_stats() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "PrimoJobs");
        assert_eq!(config.stats.len(), 4);
        assert_eq!(config.stats[0].label, "Active Jobs");
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.session.cookie, "sb-access-token");
    }

    #[test]
    fn stock_config_validates() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn stock_toml_parses_to_stock_config() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let stock = SiteConfig::default();
        assert_eq!(parsed.site.name, stock.site.name);
        assert_eq!(parsed.http.port, stock.http.port);
        assert_eq!(parsed.colors.primary, stock.colors.primary);
        assert_eq!(parsed.stats, stock.stats);
    }

    #[test]
    fn load_config_returns_stock_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config =
            load_config_with_env(&tmp.path().join("primojobs.toml"), &no_env()).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.stats.len(), 4);
    }

    #[test]
    fn load_config_merges_sparse_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("primojobs.toml");
        fs::write(
            &path,
            r##"
[site]
name = "CareerHub"

[colors]
primary = "#ff0000"
"##,
        )
        .unwrap();

        let config = load_config_with_env(&path, &no_env()).unwrap();
        assert_eq!(config.site.name, "CareerHub");
        assert_eq!(config.colors.primary, "#ff0000");
        // Untouched values keep their defaults
        assert_eq!(config.site.tagline, "Premier Job Portal for Career Growth");
        assert_eq!(config.colors.border, "#e5e7eb");
        assert_eq!(config.stats.len(), 4);
    }

    #[test]
    fn stats_list_replaces_wholesale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("primojobs.toml");
        fs::write(
            &path,
            r#"
[[stats]]
value = "12"
label = "Open Roles"
"#,
        )
        .unwrap();

        let config = load_config_with_env(&path, &no_env()).unwrap();
        assert_eq!(
            config.stats,
            vec![StatTile {
                value: "12".into(),
                label: "Open Roles".into()
            }]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("primojobs.toml");
        fs::write(&path, "[site]\nnmae = \"typo\"\n").unwrap();
        assert!(matches!(
            load_config_with_env(&path, &no_env()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("primojobs.toml");
        fs::write(&path, "[site\nname = ").unwrap();
        assert!(load_config_with_env(&path, &no_env()).is_err());
    }

    #[test]
    fn postgrest_requires_url() {
        let mut config = SiteConfig::default();
        config.backend.kind = BackendKind::Postgrest;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend.url"));

        config.backend.url = "https://xyz.supabase.co".into();
        config.validate().unwrap();
    }

    #[test]
    fn empty_color_is_rejected() {
        let mut config = SiteConfig::default();
        config.colors.danger = " ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colors.danger"));
    }

    #[test]
    fn env_overrides_apply_after_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("primojobs.toml");
        fs::write(
            &path,
            "[backend]\nkind = \"postgrest\"\nurl = \"https://file.example\"\n",
        )
        .unwrap();
        let env = FakeEnv(HashMap::from([
            ("PRIMOJOBS_BACKEND_URL", "https://env.example"),
            ("PRIMOJOBS_BACKEND_KEY", "anon-123"),
            ("PRIMOJOBS_PORT", "8081"),
        ]));

        let config = load_config_with_env(&path, &env).unwrap();
        assert_eq!(config.backend.url, "https://env.example");
        assert_eq!(config.backend.anon_key, "anon-123");
        assert_eq!(config.http.port, 8081);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn unparsable_port_override_is_a_validation_error() {
        let tmp = TempDir::new().unwrap();
        let env = FakeEnv(HashMap::from([("PRIMOJOBS_PORT", "eighty")]));
        let err = load_config_with_env(&tmp.path().join("none.toml"), &env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn color_css_uses_config_values() {
        let mut colors = ColorConfig::default();
        colors.primary = "#123456".into();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-primary: #123456"));
        assert!(css.contains("--color-border: #e5e7eb"));
    }
}
