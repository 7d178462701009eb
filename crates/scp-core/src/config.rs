//! Client configuration.
//!
//! Values come from a `terraform.tfvars`-style key/value file shared with the
//! Terraform provider of the platform, overlaid with environment variables.
//! Only `access_key`, `secret_key` and `scp_ip` are required; every other
//! field has a default matching the production deployment.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use scp_auth::credentials::mask_access_key;
use scp_auth::{Credentials, SigningScope};
use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Endpoint;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "terraform.tfvars";

/// Open-api client configuration.
///
/// # Examples
///
/// ```
/// use scp_core::ScpConfig;
///
/// let config = ScpConfig::from_tfvars_str(r#"
/// ## credentials
/// access_key = "AKIDEXAMPLE"
/// secret_key = "secret"
/// scp_ip     = "10.0.0.1"
/// "#).unwrap();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.region, "cn-south-1");
/// assert!(!config.insecure_skip_tls_verify);
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct ScpConfig {
    /// Open-api access key ID.
    #[builder(default, setter(into))]
    pub access_key: String,

    /// Open-api secret key.
    #[builder(default, setter(into))]
    pub secret_key: String,

    /// Endpoint as `host[:port]`.
    #[builder(default, setter(into))]
    pub scp_ip: String,

    /// Region component of the credential scope.
    #[builder(default = String::from(scp_auth::context::DEFAULT_REGION), setter(into))]
    pub region: String,

    /// Service component of the credential scope.
    #[builder(default = String::from(scp_auth::context::DEFAULT_SERVICE), setter(into))]
    pub service: String,

    /// `Content-Type` sent and signed with every request.
    #[builder(default = String::from(scp_auth::context::DEFAULT_CONTENT_TYPE), setter(into))]
    pub content_type: String,

    /// Accept self-signed or otherwise invalid TLS certificates.
    #[builder(default = false)]
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout in seconds.
    #[builder(default = 30)]
    pub request_timeout_secs: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"), setter(into))]
    pub log_level: String,

    /// Bind address of the metrics endpoint.
    #[builder(default = String::from("0.0.0.0:5000"), setter(into))]
    pub metrics_listen: String,
}

impl Default for ScpConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ScpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScpConfig")
            .field("access_key", &mask_access_key(&self.access_key))
            .field("secret_key", &if self.secret_key.is_empty() { "" } else { "..." })
            .field("scp_ip", &self.scp_ip)
            .field("region", &self.region)
            .field("service", &self.service)
            .field("content_type", &self.content_type)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("metrics_listen", &self.metrics_listen)
            .finish()
    }
}

/// Environment variables that override file values, and the key each maps to.
const ENV_OVERRIDES: [(&str, &str); 10] = [
    ("SCP_ACCESS_KEY", "access_key"),
    ("SCP_SECRET_KEY", "secret_key"),
    ("SCP_IP", "scp_ip"),
    ("SCP_REGION", "region"),
    ("SCP_SERVICE", "service"),
    ("SCP_CONTENT_TYPE", "content_type"),
    ("SCP_INSECURE_SKIP_TLS_VERIFY", "insecure_skip_tls_verify"),
    ("SCP_REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
    ("LOG_LEVEL", "log_level"),
    ("METRICS_LISTEN", "metrics_listen"),
];

impl ScpConfig {
    /// Parse a `terraform.tfvars`-style document.
    ///
    /// Blank lines and lines starting with `#` are skipped. Every other line
    /// must be `key = value`; surrounding whitespace and double quotes are
    /// stripped from both sides. Keys this client does not use are ignored.
    pub fn from_tfvars_str(input: &str) -> ConfigResult<Self> {
        let mut config = Self::default();

        for (idx, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Malformed {
                line_no: idx + 1,
                line: line.to_owned(),
            })?;

            config.set(key.trim(), value.trim().trim_matches('"'))?;
        }

        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_tfvars_str(&contents)
    }

    /// Overlay values from the process environment.
    ///
    /// | Variable | Key |
    /// |----------|-----|
    /// | `SCP_ACCESS_KEY` | `access_key` |
    /// | `SCP_SECRET_KEY` | `secret_key` |
    /// | `SCP_IP` | `scp_ip` |
    /// | `SCP_REGION` | `region` |
    /// | `SCP_SERVICE` | `service` |
    /// | `SCP_CONTENT_TYPE` | `content_type` |
    /// | `SCP_INSECURE_SKIP_TLS_VERIFY` | `insecure_skip_tls_verify` |
    /// | `SCP_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |
    /// | `LOG_LEVEL` | `log_level` |
    /// | `METRICS_LISTEN` | `metrics_listen` |
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        for (var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var) {
                debug!(var, key, "applying configuration override");
                self.set(key, value.trim())?;
            }
        }
        Ok(self)
    }

    /// Set one field by its configuration key.
    fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "access_key" => self.access_key = value.to_owned(),
            "secret_key" => self.secret_key = value.to_owned(),
            "scp_ip" => self.scp_ip = value.to_owned(),
            "region" => self.region = value.to_owned(),
            "service" => self.service = value.to_owned(),
            "content_type" => self.content_type = value.to_owned(),
            "insecure_skip_tls_verify" => self.insecure_skip_tls_verify = parse_bool(value),
            "request_timeout_secs" => {
                self.request_timeout_secs =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    })?;
            }
            "log_level" => self.log_level = value.to_owned(),
            "metrics_listen" => self.metrics_listen = value.to_owned(),
            _ => debug!(key, "ignoring unknown configuration key"),
        }
        Ok(())
    }

    /// Check that every required field is present and well-formed.
    pub fn validate(&self) -> ConfigResult<()> {
        let missing: Vec<&'static str> = [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("scp_ip", &self.scp_ip),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        self.endpoint()?;
        Ok(())
    }

    /// The validated credential pair.
    pub fn credentials(&self) -> ConfigResult<Credentials> {
        self.validate()?;
        Ok(Credentials::new(&*self.access_key, &*self.secret_key)?)
    }

    /// The validated endpoint.
    pub fn endpoint(&self) -> ConfigResult<Endpoint> {
        Endpoint::new(self.scp_ip.as_str())
    }

    /// The deployment scope bound into every signature.
    #[must_use]
    pub fn signing_scope(&self) -> SigningScope {
        SigningScope::new(&*self.region, &*self.service, &*self.content_type)
    }

    /// The per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
# SCP open-api credentials
access_key = "AKIDEXAMPLE"
secret_key = "secret"
scp_ip = "10.0.0.1"

# used by the terraform provider only
project = "demo"
"#;

    #[test]
    fn test_should_create_default_config() {
        let config = ScpConfig::default();
        assert_eq!(config.region, "cn-south-1");
        assert_eq!(config.service, "open-api");
        assert_eq!(config.content_type, "application/json");
        assert!(!config.insecure_skip_tls_verify);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.metrics_listen, "0.0.0.0:5000");
    }

    #[test]
    fn test_should_parse_tfvars_and_ignore_unknown_keys() {
        let config = ScpConfig::from_tfvars_str(SAMPLE).unwrap();
        assert_eq!(config.access_key, "AKIDEXAMPLE");
        assert_eq!(config.secret_key, "secret");
        assert_eq!(config.scp_ip, "10.0.0.1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_should_keep_equals_signs_inside_values() {
        let config = ScpConfig::from_tfvars_str(r#"secret_key = "abc==""#).unwrap();
        assert_eq!(config.secret_key, "abc==");
    }

    #[test]
    fn test_should_reject_line_without_equals() {
        let err = ScpConfig::from_tfvars_str("access_key = \"a\"\nnot a pair\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line_no: 2, .. }));
    }

    #[test]
    fn test_should_report_every_missing_field() {
        let config = ScpConfig::from_tfvars_str("access_key = \"AKIDEXAMPLE\"").unwrap();
        match config.validate() {
            Err(ConfigError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["secret_key", "scp_ip"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_should_fail_credentials_when_secret_missing() {
        let config = ScpConfig::from_tfvars_str("access_key = \"A\"\nscp_ip = \"10.0.0.1\"").unwrap();
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingFields(fields)) if fields == vec!["secret_key"]
        ));
    }

    #[test]
    fn test_should_reject_endpoint_with_scheme() {
        let config = ScpConfig::builder()
            .access_key("A")
            .secret_key("S")
            .scp_ip("https://10.0.0.1")
            .build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_should_apply_overrides_over_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCP_SECRET_KEY", "from-env"),
            ("SCP_INSECURE_SKIP_TLS_VERIFY", "true"),
            ("SCP_REQUEST_TIMEOUT_SECS", "5"),
            ("SCP_REGION", "cn-north-2"),
        ]);
        let config = ScpConfig::from_tfvars_str(SAMPLE)
            .unwrap()
            .with_overrides(|var| vars.get(var).map(|v| (*v).to_owned()))
            .unwrap();

        assert_eq!(config.secret_key, "from-env");
        assert!(config.insecure_skip_tls_verify);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.signing_scope().region, "cn-north-2");
        assert_eq!(config.access_key, "AKIDEXAMPLE");
    }

    #[test]
    fn test_should_reject_non_numeric_timeout() {
        let result = ScpConfig::default()
            .with_overrides(|var| (var == "SCP_REQUEST_TIMEOUT_SECS").then(|| "soon".to_owned()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_should_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ScpConfig::load(file.path()).unwrap();
        assert_eq!(config.endpoint().unwrap().as_str(), "10.0.0.1");
        assert_eq!(config.credentials().unwrap().access_key(), "AKIDEXAMPLE");
    }

    #[test]
    fn test_should_report_missing_file() {
        let result = ScpConfig::load("/nonexistent/terraform.tfvars");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let config = ScpConfig::from_tfvars_str(SAMPLE).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("secret_key: \"...\""));
    }

    #[test]
    fn test_should_mask_access_key_in_debug_output() {
        let config = ScpConfig::builder()
            .access_key("AKIDEXAMPLEFULLKEY")
            .secret_key("s3cr3t-value")
            .scp_ip("10.0.0.1")
            .build();
        let debug = format!("{config:?}");
        assert!(!debug.contains("AKIDEXAMPLEFULLKEY"));
        assert!(!debug.contains("s3cr3t-value"));
        assert!(debug.contains("access_key: \"AKID**************\""));
    }
}
