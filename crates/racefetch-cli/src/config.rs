//! Providers file loading
//!
//! This module handles loading a race definition from:
//! - A file given on the command line or through `RACEFETCH_CONFIG`
//! - Default locations in the working, config and home directories
//!
//! `${ENV:NAME}` placeholders in `baseUrl` and header values are expanded
//! from the environment before the providers are parsed.

use crate::error::{Error, Result};
use racefetch_core::{ProviderSet, RaceOptions};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Race options as written in a providers file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileOptions {
    pub timeout_per_attempt_ms: Option<u64>,
    pub retry_on_fail: Option<bool>,
    pub reject_error_status: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_retry: Option<u32>,
}

/// Command-line flags that take precedence over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceOverrides {
    pub timeout_per_attempt_ms: Option<u64>,
    pub no_fallback: bool,
    pub reject_error_status: bool,
}

/// A loaded providers file
#[derive(Debug, Clone)]
pub struct RaceFile {
    pub path: PathBuf,
    pub options: FileOptions,
    pub providers: ProviderSet,
}

#[derive(Deserialize)]
struct RawRaceFile {
    #[serde(default)]
    options: FileOptions,
    providers: Option<Value>,
}

impl RaceFile {
    /// Load from `file`, or from the first default location that exists
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let path = match file {
            Some(path) => path.to_path_buf(),
            None => Self::default_paths()
                .into_iter()
                .find(|path| path.exists())
                .ok_or_else(|| {
                    Error::config("no providers file given and none found in default locations")
                })?,
        };

        Self::from_file(&path)
    }

    /// Load a providers file; YAML by extension, JSON otherwise
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let mut document: Value = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML".to_string(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON".to_string(),
                reason: e.to_string(),
            })?
        };

        if let Some(providers) = document.get_mut("providers") {
            expand_providers(providers)?;
        }

        let raw: RawRaceFile = serde_json::from_value(document)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        let providers = raw
            .providers
            .ok_or_else(|| Error::config(format!("{}: missing 'providers'", path.display())))?;

        Ok(Self {
            path: path.to_path_buf(),
            options: raw.options,
            providers: ProviderSet::from_value(providers)?,
        })
    }

    /// Default providers file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("racefetch.yaml"),
            PathBuf::from("racefetch.yml"),
            PathBuf::from("racefetch.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let racefetch_dir = config_dir.join("racefetch");
            paths.push(racefetch_dir.join("providers.yaml"));
            paths.push(racefetch_dir.join("providers.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".racefetch.yaml"));
            paths.push(home_dir.join(".racefetch.json"));
        }

        paths
    }

    /// Race options from the file with command-line overrides applied
    pub fn race_options(&self, overrides: &RaceOverrides) -> RaceOptions {
        let file = &self.options;
        let mut options = RaceOptions::new();

        if let Some(ms) = overrides.timeout_per_attempt_ms.or(file.timeout_per_attempt_ms) {
            options = options.with_timeout_per_attempt(Duration::from_millis(ms));
        }
        if let Some(retry) = file.retry_on_fail {
            options = options.with_retry_on_fail(retry);
        }
        if overrides.no_fallback {
            options = options.with_retry_on_fail(false);
        }
        if overrides.reject_error_status || file.reject_error_status == Some(true) {
            options = options.with_reject_error_status(true);
        }
        if let Some(ms) = file.timeout_ms {
            options = options.with_timeout(Duration::from_millis(ms));
        }
        if let Some(max_attempts) = file.max_attempts {
            options = options.with_max_attempts(max_attempts);
        }
        if let Some(max_retry) = file.max_retry {
            options = options.with_max_retry(max_retry);
        }

        options
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Expand placeholders in every descriptor of a list or keyed providers value
fn expand_providers(providers: &mut Value) -> Result<()> {
    match providers {
        Value::Array(list) => {
            for descriptor in list {
                expand_descriptor(descriptor)?;
            }
        }
        Value::Object(entries) => {
            for entry in entries.values_mut() {
                if let Some(descriptor) = entry.get_mut("provider") {
                    expand_descriptor(descriptor)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn expand_descriptor(descriptor: &mut Value) -> Result<()> {
    if let Some(Value::String(base_url)) = descriptor.get_mut("baseUrl") {
        *base_url = expand_env_vars(base_url)?;
    }

    if let Some(Value::Object(headers)) = descriptor.get_mut("headers") {
        for value in headers.values_mut() {
            if let Value::String(text) = value {
                *text = expand_env_vars(text)?;
            }
        }
    }

    Ok(())
}

/// Expand environment variables in the format ${ENV:VAR_NAME}
pub fn expand_env_vars(value: &str) -> Result<String> {
    let re = Regex::new(r"\$\{ENV:([^}]+)\}")
        .map_err(|e| Error::config(format!("invalid placeholder pattern: {}", e)))?;

    let mut result = value.to_string();
    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let env_value = std::env::var(var_name)
            .map_err(|_| Error::config(format!("Environment variable {} not found", var_name)))?;

        let pattern = format!("${{ENV:{}}}", var_name);
        result = result.replace(&pattern, &env_value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const YAML_LIST: &str = r#"
options:
  timeoutPerAttemptMs: 1500
  retryOnFail: true
providers:
  - name: primary
    method: GET
    baseUrl: https://a.example.com
    pathname: /rates
    responseType: application/json
  - name: mirror
    method: GET
    baseUrl: https://b.example.com
    pathname: /rates
    responseType: application/json
    priority: 0
"#;

    #[test]
    fn test_load_yaml_list() {
        let file = write_file(".yaml", YAML_LIST);
        let race = RaceFile::from_file(file.path()).unwrap();

        assert_eq!(race.options.timeout_per_attempt_ms, Some(1500));
        assert_eq!(race.providers.len(), 2);

        let providers = race.providers.into_descriptors();
        assert_eq!(providers[1].name(), "mirror");
        assert_eq!(providers[1].priority(), Some(0));
    }

    #[test]
    fn test_load_json_keyed() {
        let file = write_file(
            ".json",
            r#"{
                "providers": {
                    "primary": {
                        "provider": {
                            "name": "primary",
                            "method": "GET",
                            "baseUrl": "https://a.example.com",
                            "pathname": "/",
                            "responseType": "text/plain"
                        },
                        "priority": 1
                    }
                }
            }"#,
        );
        let race = RaceFile::from_file(file.path()).unwrap();

        assert_eq!(race.options, FileOptions::default());
        let providers = race.providers.into_descriptors();
        assert_eq!(providers[0].priority(), Some(1));
    }

    #[test]
    fn test_env_expansion() {
        std::env::set_var("RACEFETCH_TEST_TOKEN", "abc123");
        std::env::set_var("RACEFETCH_TEST_HOST", "https://env.example.com");

        let file = write_file(
            ".yaml",
            r#"
providers:
  - name: primary
    method: GET
    baseUrl: ${ENV:RACEFETCH_TEST_HOST}
    pathname: /v1
    headers:
      Authorization: Bearer ${ENV:RACEFETCH_TEST_TOKEN}
    responseType: application/json
"#,
        );
        let race = RaceFile::from_file(file.path()).unwrap();
        let providers = race.providers.into_descriptors();

        assert_eq!(providers[0].base_url(), "https://env.example.com");
        assert_eq!(
            providers[0].headers().unwrap().get("Authorization").unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_missing_env_var() {
        let result = expand_env_vars("${ENV:RACEFETCH_TEST_DEFINITELY_UNSET}");
        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(expand_env_vars("no placeholders").unwrap(), "no placeholders");
    }

    #[test]
    fn test_file_errors() {
        let missing = RaceFile::from_file(Path::new("/nonexistent/racefetch.yaml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));

        let broken = write_file(".json", "{ not json");
        assert!(matches!(
            RaceFile::from_file(broken.path()),
            Err(Error::InvalidFormat { .. })
        ));

        let empty = write_file(".yaml", "options: {}\n");
        assert!(matches!(RaceFile::from_file(empty.path()), Err(Error::Config(_))));

        let invalid = write_file(".yaml", "providers: 42\n");
        assert!(matches!(RaceFile::from_file(invalid.path()), Err(Error::Core(_))));
    }

    #[test]
    fn test_race_options_overrides() {
        let file = write_file(".yaml", YAML_LIST);
        let race = RaceFile::from_file(file.path()).unwrap();

        let options = race.race_options(&RaceOverrides::default());
        assert_eq!(options.timeout_per_attempt, Some(Duration::from_millis(1500)));
        assert!(options.retry_on_fail);
        assert!(!options.reject_error_status);

        let options = race.race_options(&RaceOverrides {
            timeout_per_attempt_ms: Some(200),
            no_fallback: true,
            reject_error_status: true,
        });
        assert_eq!(options.timeout_per_attempt, Some(Duration::from_millis(200)));
        assert!(!options.retry_on_fail);
        assert!(options.reject_error_status);
    }
}
