//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides.
//! Sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `jobdesk.yaml`)
//! 2. **Environment variables** - Variables prefixed with `JOBDESK_` override YAML values
//!
//! For nested config values, use double underscores in environment variables, e.g.
//! `JOBDESK_GATEWAY__SERVICE_ROLE_KEY=...` sets the `gateway.service_role_key` field.
//!
//! ```no_run
//! use jobdesk::config::Config;
//!
//! # fn main() -> Result<(), figment::Error> {
//! let config = Config::load("jobdesk.yaml")?;
//! println!("Gateway at {}", config.gateway.base_url);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Main application configuration.
///
/// All fields have defaults suitable for local development against a locally
/// running gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote gateway connection settings
    pub gateway: GatewayConfig,
    /// Object storage settings for job and logo images
    pub storage: StorageConfig,
    /// Outbound email dispatch settings (best-effort side-channel)
    pub email: EmailConfig,
}

/// Remote data gateway configuration.
///
/// The gateway is a managed BaaS exposing collection endpoints under `/rest/v1`,
/// the auth-admin API under `/auth/v1/admin`, object storage under
/// `/storage/v1`, and invocable functions under `/functions/v1`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the managed backend (e.g. "https://abc.supabase.co")
    pub base_url: Url,
    /// Publishable API key sent with every request
    pub api_key: String,
    /// Service-role key for privileged identity operations. When absent, the
    /// user listing falls back to the profiles tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_role_key: Option<String>,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Bucket receiving uploaded job images and company logos
    pub bucket: String,
}

/// Email dispatch configuration.
///
/// Email is sent by invoking a named remote function with a
/// `{to, subject, html}` payload. Delivery is best-effort: failures are logged
/// and never surfaced to the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    /// Enable the email side-channel on admin replies
    pub enabled: bool,
    /// Name of the remote function that performs the dispatch
    pub function: String,
    /// Sender display name used in reply bodies
    pub from_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            storage: StorageConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:54321").unwrap(),
            api_key: String::new(),
            service_role_key: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "job-images".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            function: "send-email".to_string(),
            from_name: "JobDesk Admin".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    /// The figment used by [`Config::load`], exposed for tests
    pub fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("JOBDESK_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.storage.bucket, "job-images");
        assert!(config.email.enabled);
        assert!(config.gateway.service_role_key.is_none());
    }

    #[test]
    fn env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jobdesk.yaml",
                r#"
gateway:
  base_url: "https://example.supabase.co"
  api_key: "anon-key"
storage:
  bucket: "from-yaml"
"#,
            )?;
            jail.set_env("JOBDESK_STORAGE__BUCKET", "from-env");

            let config: Config = Config::figment("jobdesk.yaml").extract()?;
            assert_eq!(config.gateway.api_key, "anon-key");
            assert_eq!(config.storage.bucket, "from-env");
            Ok(())
        });
    }
}
