//! Runtime configuration.
//!
//! Settings come from an optional JSON file, then environment variables,
//! then command-line flags; each layer overrides the one before it. Only the
//! gateway wiring and the preselected country code are configurable.
use crate::gateway::{
    AirtableGateway, AirtableSettings, DryRunGateway, EndpointGateway, Gateway, DEFAULT_TABLE_NAME,
};
use crate::survey::schema::{is_known_country_code, DEFAULT_COUNTRY_CODE};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const ENDPOINT_ENV: &str = "FLEXIRENT_SURVEY_ENDPOINT";
pub const AIRTABLE_BASE_ID_ENV: &str = "AIRTABLE_BASE_ID";
pub const AIRTABLE_TABLE_NAME_ENV: &str = "AIRTABLE_TABLE_NAME";
pub const DEFAULT_API_KEY_ENV: &str = "AIRTABLE_API_KEY";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where finished records go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    /// Validate and map the record, write nothing.
    #[default]
    DryRun,
    /// POST to the survey submission endpoint.
    Endpoint,
    /// Write straight to the Airtable table.
    Airtable,
}

impl GatewayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayKind::DryRun => "dry_run",
            GatewayKind::Endpoint => "endpoint",
            GatewayKind::Airtable => "airtable",
        }
    }

    pub fn parse(raw: &str) -> Option<GatewayKind> {
        [
            GatewayKind::DryRun,
            GatewayKind::Endpoint,
            GatewayKind::Airtable,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == raw.trim())
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirtableConfig {
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        AirtableConfig {
            base_id: None,
            table_name: None,
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyConfig {
    pub schema_version: u32,
    #[serde(default)]
    pub gateway: GatewayKind,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn default_config() -> SurveyConfig {
    SurveyConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        gateway: GatewayKind::default(),
        endpoint_url: None,
        airtable: AirtableConfig::default(),
        default_country_code: default_country_code(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
}

/// `<config dir>/flexirent/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flexirent").join("config.json"))
}

/// Load and validate the config.
///
/// An explicit path must exist. Without one the default location is used if
/// present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<SurveyConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => path,
            None => return Ok(default_config()),
        },
    };
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: SurveyConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config {}", path.display()))?;
    validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), gateway = %config.gateway, "loaded config");
    Ok(config)
}

pub fn validate_config(config: &SurveyConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if !is_known_country_code(&config.default_country_code) {
        return Err(anyhow!(
            "default_country_code {:?} is not a supported country code",
            config.default_country_code
        ));
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    if config.airtable.api_key_env.trim().is_empty() {
        return Err(anyhow!("airtable.api_key_env must be non-empty"));
    }
    Ok(())
}

/// Command-line overrides for the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayOverrides {
    pub kind: Option<GatewayKind>,
    pub endpoint_url: Option<String>,
}

/// Fully resolved gateway wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewaySettings {
    DryRun,
    Endpoint { url: String },
    Airtable(AirtableSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGateway {
    pub settings: GatewaySettings,
    pub timeout: Duration,
}

/// Combine file, environment, and flags. `env` looks up one variable.
pub fn resolve_gateway(
    config: &SurveyConfig,
    overrides: &GatewayOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedGateway> {
    let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());
    let kind = overrides.kind.unwrap_or(config.gateway);
    let settings = match kind {
        GatewayKind::DryRun => GatewaySettings::DryRun,
        GatewayKind::Endpoint => {
            let url = overrides
                .endpoint_url
                .clone()
                .or_else(|| lookup(ENDPOINT_ENV))
                .or_else(|| config.endpoint_url.clone())
                .ok_or_else(|| {
                    anyhow!("endpoint gateway needs --endpoint, {ENDPOINT_ENV}, or endpoint_url")
                })?;
            GatewaySettings::Endpoint { url }
        }
        GatewayKind::Airtable => GatewaySettings::Airtable(AirtableSettings {
            base_id: lookup(AIRTABLE_BASE_ID_ENV).or_else(|| config.airtable.base_id.clone()),
            table_name: lookup(AIRTABLE_TABLE_NAME_ENV)
                .or_else(|| config.airtable.table_name.clone())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            api_key: lookup(&config.airtable.api_key_env),
        }),
    };
    Ok(ResolvedGateway {
        settings,
        timeout: Duration::from_secs(config.timeout_secs),
    })
}

/// Resolve against the process environment.
pub fn resolve_gateway_from_env(
    config: &SurveyConfig,
    overrides: &GatewayOverrides,
) -> Result<ResolvedGateway> {
    resolve_gateway(config, overrides, |name| std::env::var(name).ok())
}

pub fn build_gateway(resolved: &ResolvedGateway) -> Box<dyn Gateway> {
    let timeout = Some(resolved.timeout);
    match &resolved.settings {
        GatewaySettings::DryRun => Box::new(DryRunGateway::new()),
        GatewaySettings::Endpoint { url } => Box::new(EndpointGateway::new(url.clone(), timeout)),
        GatewaySettings::Airtable(settings) => {
            Box::new(AirtableGateway::new(settings.clone(), timeout))
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
