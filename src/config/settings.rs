//! Application settings and configuration
//!
//! Settings come from environment variables (optionally via a `.env` file)
//! with defaults. Command-line flags override them in `main.rs`.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::emit::Target;
use crate::logging::LogFormat;

/// Prefix of every environment variable read by [`Settings::load`].
pub const ENV_PREFIX: &str = "OPEN_SCHEMAS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub app_version: String,
    /// `tracing` filter directive, e.g. `info` or `open_schemas=debug`.
    pub log_level: String,
    pub log_format: LogFormat,
    /// Root directory for emitted documents.
    pub out_dir: PathBuf,
    /// Formats written by `emit` when none are given on the command line.
    pub targets: Vec<Target>,
    /// Pretty-print emitted JSON.
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            out_dir: PathBuf::from("schemas"),
            targets: Target::ALL.to_vec(),
            pretty: true,
        }
    }
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source. `lookup` receives
    /// the full variable name, e.g. `OPEN_SCHEMAS_LOG_LEVEL`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let defaults = Self::default();

        let settings = Self {
            app_version: defaults.app_version,
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: match var("LOG_FORMAT") {
                Some(value) => value.parse().context("Invalid OPEN_SCHEMAS_LOG_FORMAT value")?,
                None => defaults.log_format,
            },
            out_dir: var("OUT_DIR").map(PathBuf::from).unwrap_or(defaults.out_dir),
            targets: match var("TARGETS") {
                Some(value) => parse_targets(&value).context("Invalid OPEN_SCHEMAS_TARGETS value")?,
                None => defaults.targets,
            },
            pretty: match var("PRETTY") {
                Some(value) => parse_bool(&value).context("Invalid OPEN_SCHEMAS_PRETTY value")?,
                None => defaults.pretty,
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            anyhow::bail!("At least one emit target is required");
        }
        if self.out_dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory cannot be empty");
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;
        Ok(())
    }
}

/// Comma-separated target list, e.g. `json-schema,openapi`.
fn parse_targets(value: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let target: Target = item.parse()?;
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    Ok(targets)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.targets, vec![Target::JsonSchema, Target::OpenApi]);
        assert_eq!(settings.out_dir, PathBuf::from("schemas"));
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("LOG_LEVEL", "open_schemas=debug"),
            ("LOG_FORMAT", "json"),
            ("OUT_DIR", "/tmp/out"),
            ("TARGETS", "openapi, openapi"),
            ("PRETTY", "off"),
        ])
        .unwrap();
        assert_eq!(settings.log_level, "open_schemas=debug");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.targets, vec![Target::OpenApi]);
        assert!(!settings.pretty);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("TARGETS", "typescript")]).is_err());
        assert!(load(&[("TARGETS", " , ")]).is_err());
        assert!(load(&[("PRETTY", "maybe")]).is_err());
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[("OUT_DIR", "")]).is_err());
    }
}
