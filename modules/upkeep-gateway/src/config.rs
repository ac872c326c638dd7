//! Gateway configuration.
//!
//! Loaded with figment: defaults, then an optional YAML file, then
//! `UPKEEP_GATEWAY__*` environment variables (`__` separates nested keys,
//! e.g. `UPKEEP_GATEWAY__RETRY__MAX_RETRIES=5`). Durations are humantime
//! strings such as `"250ms"` or `"30s"`.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};
use upkeep_http::{
    ExponentialBackoff, HttpClientConfig, RetryConfig, TlsRootConfig, TransportSecurity,
};
use url::Url;

use crate::error::GatewayError;

/// Prefix of the environment variables read by [`GatewayConfig::load`]
pub const ENV_PREFIX: &str = "UPKEEP_GATEWAY__";

pub const DEFAULT_USER_AGENT: &str = concat!("upkeep-gateway/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Gateway endpoint; domain paths are appended under `/api/`
    pub base_url: Url,

    /// Timeout for a single attempt
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Deadline across every attempt and backoff sleep
    #[serde(default, with = "humantime_serde::option")]
    pub total_timeout: Option<Duration>,

    /// Cap on decoded response bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept an `http://` base URL. Local development and tests only.
    #[serde(default)]
    pub allow_insecure_http: bool,

    /// Header carrying the active organization
    #[serde(default = "default_organization_header")]
    pub organization_header: String,

    #[serde(default)]
    pub tls_roots: TlsRoots,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// Trust anchors for the gateway certificate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsRoots {
    #[default]
    Webpki,
    Native,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_retries: usize,
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    pub multiplier: f64,
    pub jitter: bool,
    /// Sleep for the gateway's `Retry-After` instead of the computed backoff
    pub honor_retry_after: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let backoff = ExponentialBackoff::default();
        Self {
            enabled: true,
            max_retries: 3,
            initial_backoff: backoff.initial,
            max_backoff: backoff.max,
            multiplier: backoff.multiplier,
            jitter: backoff.jitter,
            honor_retry_after: true,
        }
    }
}

impl RetrySettings {
    /// Transport policy, `None` when retries are off.
    #[must_use]
    pub fn to_retry_config(&self) -> Option<RetryConfig> {
        self.enabled.then(|| RetryConfig {
            max_retries: self.max_retries,
            backoff: ExponentialBackoff {
                initial: self.initial_backoff,
                max: self.max_backoff,
                multiplier: self.multiplier,
                jitter: self.jitter,
            },
            ignore_retry_after: !self.honor_retry_after,
            ..RetryConfig::default()
        })
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

fn default_organization_header() -> String {
    upkeep_session::DEFAULT_ORGANIZATION_HEADER.as_str().to_owned()
}

impl GatewayConfig {
    /// Defaults for everything but the endpoint.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: default_request_timeout(),
            total_timeout: None,
            max_body_size: default_max_body_size(),
            user_agent: default_user_agent(),
            allow_insecure_http: false,
            organization_header: default_organization_header(),
            tls_roots: TlsRoots::default(),
            retry: RetrySettings::default(),
        }
    }

    /// Read the optional YAML file, then apply `UPKEEP_GATEWAY__*` overrides.
    ///
    /// # Errors
    /// `Config` when `base_url` is missing or a value fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, GatewayError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// # Errors
    /// `Config` when extraction fails.
    pub fn from_figment(figment: Figment) -> Result<Self, GatewayError> {
        figment
            .extract()
            .map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Transport settings for the underlying HTTP client.
    #[must_use]
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            total_timeout: self.total_timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            retry: self.retry.to_retry_config(),
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            tls_roots: match self.tls_roots {
                TlsRoots::Webpki => TlsRootConfig::WebPki,
                TlsRoots::Native => TlsRootConfig::Native,
            },
            ..HttpClientConfig::default()
        }
    }
}

/// humantime strings for `Duration` fields
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer, de};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => s.collect_str(&humantime::format_duration(*d)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| humantime::parse_duration(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
