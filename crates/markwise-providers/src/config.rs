//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use markwise_core::traits::Assessor;

use crate::anthropic::AnthropicAssessor;
use crate::openai::OpenAiAssessor;

/// Configuration for a single assessor backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Model and sampling settings fixed when an assessor is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessorSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Top-level markwise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkwiseConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Default sampling temperature.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Token limit for each judgment.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Max concurrent assessor calls in batch mode.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-5-mini".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./markwise-results")
}

impl Default for MarkwiseConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

impl MarkwiseConfig {
    /// Settings for the given model (or the default model).
    pub fn assessor_settings(&self, model: Option<&str>, temperature: Option<f64>) -> AssessorSettings {
        AssessorSettings {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: temperature.unwrap_or(self.default_temperature),
            max_tokens: self.max_tokens,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `markwise.toml` in the current directory
/// 2. `~/.config/markwise/config.toml`
///
/// Environment variable overrides: `MARKWISE_OPENAI_KEY`, `MARKWISE_ANTHROPIC_KEY`.
/// `OPENAI_API_KEY` fills the OpenAI key when nothing else provides one.
pub fn load_config() -> Result<MarkwiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MarkwiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("markwise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MarkwiseConfig::default(),
    };

    apply_env_overrides(&mut config);

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<MarkwiseConfig> {
    Ok(toml::from_str::<MarkwiseConfig>(content)?)
}

fn apply_env_overrides(config: &mut MarkwiseConfig) {
    if let Ok(key) = std::env::var("MARKWISE_ANTHROPIC_KEY") {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }

    let openai_key = std::env::var("MARKWISE_OPENAI_KEY").ok();
    let fallback_key = std::env::var("OPENAI_API_KEY").ok();
    match config.providers.get_mut("openai") {
        Some(ProviderConfig::OpenAI { api_key, .. }) => {
            if let Some(key) = openai_key {
                *api_key = key;
            } else if api_key.is_empty() {
                if let Some(key) = fallback_key {
                    *api_key = key;
                }
            }
        }
        Some(_) => {}
        None => {
            if let Some(key) = openai_key.or(fallback_key) {
                config.providers.insert(
                    "openai".into(),
                    ProviderConfig::OpenAI {
                        api_key: key,
                        base_url: None,
                        org_id: None,
                    },
                );
            }
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("markwise"))
}

/// Create an assessor from its configuration.
pub fn create_assessor(
    config: &ProviderConfig,
    settings: AssessorSettings,
) -> Result<Arc<dyn Assessor>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            anyhow::ensure!(!api_key.is_empty(), "openai provider has no api_key");
            Ok(Arc::new(OpenAiAssessor::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
                settings,
            )?))
        }
        ProviderConfig::Anthropic { api_key, base_url } => {
            anyhow::ensure!(!api_key.is_empty(), "anthropic provider has no api_key");
            Ok(Arc::new(AnthropicAssessor::new(
                api_key,
                base_url.clone(),
                settings,
            )?))
        }
    }
}

/// Look up a named provider in the config and build its assessor.
pub fn assessor_from_config(
    config: &MarkwiseConfig,
    provider: Option<&str>,
    settings: AssessorSettings,
) -> Result<Arc<dyn Assessor>> {
    let name = provider.unwrap_or(&config.default_provider);
    let Some(provider_config) = config.providers.get(name) else {
        anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}",
            name,
            config.providers.keys().collect::<Vec<_>>()
        );
    };
    create_assessor(provider_config, settings)
        .with_context(|| format!("failed to create provider '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MARKWISE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_MARKWISE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_MARKWISE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_MARKWISE_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_rescanned() {
        std::env::set_var("_MARKWISE_SELF_REF", "${_MARKWISE_SELF_REF}");
        assert_eq!(
            resolve_env_vars("key=${_MARKWISE_SELF_REF}!"),
            "key=${_MARKWISE_SELF_REF}!"
        );
        std::env::remove_var("_MARKWISE_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = MarkwiseConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-5-mini");
        assert_eq!(config.default_temperature, 0.2);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "anthropic"
default_model = "claude-sonnet-4-20250514"
parallelism = 8

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"
org_id = "org-1"
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.max_tokens, 1500);
        assert!(matches!(
            config.providers.get("anthropic"),
            Some(ProviderConfig::Anthropic { .. })
        ));
    }

    #[test]
    fn debug_masks_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
            org_id: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let config = MarkwiseConfig::default();
        let settings = config.assessor_settings(None, None);
        assert_eq!(settings.model, "gpt-5-mini");
        assert_eq!(settings.temperature, 0.2);

        let settings = config.assessor_settings(Some("gpt-4o-mini"), Some(0.0));
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.temperature, 0.0);
    }

    #[test]
    fn load_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markwise.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o-mini"

[providers.local]
type = "openai"
api_key = "sk-local"
base_url = "http://localhost:8080"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert!(matches!(
            config.providers.get("local"),
            Some(ProviderConfig::OpenAI { base_url: Some(url), .. }) if url == "http://localhost:8080"
        ));
    }

    #[test]
    fn unknown_provider_is_reported() {
        let config = MarkwiseConfig::default();
        let settings = config.assessor_settings(None, None);
        let err = assessor_from_config(&config, Some("nowhere"), settings)
            .err()
            .unwrap();
        assert!(err.to_string().contains("provider 'nowhere' not found"));
    }

    #[test]
    fn create_requires_api_key() {
        let config = ProviderConfig::Anthropic {
            api_key: String::new(),
            base_url: None,
        };
        let settings = MarkwiseConfig::default().assessor_settings(None, None);
        assert!(create_assessor(&config, settings).is_err());
    }

    #[test]
    fn create_builds_named_assessors() {
        let settings = MarkwiseConfig::default().assessor_settings(None, None);
        let openai = create_assessor(
            &ProviderConfig::OpenAI {
                api_key: "k".into(),
                base_url: None,
                org_id: None,
            },
            settings.clone(),
        )
        .unwrap();
        assert_eq!(openai.name(), "openai");

        let anthropic = create_assessor(
            &ProviderConfig::Anthropic {
                api_key: "k".into(),
                base_url: None,
            },
            settings,
        )
        .unwrap();
        assert_eq!(anthropic.name(), "anthropic");
    }
}
