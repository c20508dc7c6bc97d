//! Evaluation client configuration.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::retry::RetryConfig;
use crate::transport::{ReqwestTransport, Transport, TransportSettings};
use crate::{EvaluationError, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the API key identifier.
pub const API_KEY_ID_HEADER: &str = "x-api-key-id";

/// Default number of attempts per evaluation.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default wait between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// API credentials sent with every evaluation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_key_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_key_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_key_id: api_key_id.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_key_id", &self.api_key_id)
            .finish()
    }
}

/// Immutable evaluation client configuration.
///
/// Built once through [`ClientConfig::builder`] and shared read-only by every
/// evaluation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    host: String,
    base_url: Url,
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
    credentials: Option<Credentials>,
    default_headers: HeaderMap,
}

impl ClientConfig {
    /// Create a new configuration builder for `host`.
    ///
    /// `host` may be a bare authority (`flags.example.com:8443`) or a URL; any
    /// scheme it carries is replaced by `https`.
    pub fn builder(host: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(host)
    }

    /// Configured host, as given.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Maximum attempts per evaluation.
    pub fn max_retries(&self) -> u32 {
        self.retry.max_attempts
    }

    /// Wait between attempts.
    pub fn retry_interval(&self) -> Duration {
        self.retry.delay_for_attempt(1)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Headers attached to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Build the URL for an evaluation `path`.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    /// Build a configuration from `WINGS_*` environment variables.
    ///
    /// | Variable                  | Meaning                 |
    /// |---------------------------|-------------------------|
    /// | `WINGS_HOST`              | Service host (required) |
    /// | `WINGS_MAX_RETRIES`       | Attempts per evaluation |
    /// | `WINGS_RETRY_INTERVAL_MS` | Wait between attempts   |
    /// | `WINGS_TIMEOUT_MS`        | Per-request timeout     |
    /// | `WINGS_API_KEY`           | API key                 |
    /// | `WINGS_API_KEY_ID`        | API key identifier      |
    pub fn from_env() -> Result<Self> {
        ClientConfigBuilder::from_lookup(|key| std::env::var(key).ok())?.build()
    }
}

/// Resolve the configured host into an `https` base URL.
fn https_base_url(host: &str) -> Result<Url> {
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(EvaluationError::InvalidUrl("host must be non-empty".to_string()));
    }

    let authority = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    let url = Url::parse(&format!("https://{authority}"))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(EvaluationError::InvalidUrl(format!("no host in {host:?}")));
    }
    Ok(url)
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    host: String,
    transport: Option<Arc<dyn Transport>>,
    max_retries: u32,
    retry_interval: Duration,
    credentials: Option<Credentials>,
    settings: TransportSettings,
}

impl ClientConfigBuilder {
    fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            transport: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            credentials: None,
            settings: TransportSettings::default(),
        }
    }

    /// Start a builder from `WINGS_*` variables resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("WINGS_HOST")
            .ok_or_else(|| EvaluationError::Config("WINGS_HOST is not set".to_string()))?;
        let mut builder = Self::new(host);

        if let Some(raw) = lookup("WINGS_MAX_RETRIES") {
            builder.max_retries = parse_var("WINGS_MAX_RETRIES", &raw)?;
        }
        if let Some(raw) = lookup("WINGS_RETRY_INTERVAL_MS") {
            builder.retry_interval =
                Duration::from_millis(parse_var("WINGS_RETRY_INTERVAL_MS", &raw)?);
        }
        if let Some(raw) = lookup("WINGS_TIMEOUT_MS") {
            builder.settings.timeout = Duration::from_millis(parse_var("WINGS_TIMEOUT_MS", &raw)?);
        }
        match (lookup("WINGS_API_KEY"), lookup("WINGS_API_KEY_ID")) {
            (Some(key), Some(id)) => builder.credentials = Some(Credentials::new(key, id)),
            (None, None) => {}
            _ => {
                return Err(EvaluationError::Config(
                    "WINGS_API_KEY and WINGS_API_KEY_ID must be set together".to_string(),
                ));
            }
        }

        Ok(builder)
    }

    /// Set the maximum number of attempts per evaluation.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the constant wait between attempts.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Send API credentials with every request.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the per-request timeout of the built-in transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Set the connection timeout of the built-in transport.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connect_timeout = timeout;
        self
    }

    /// Set the user agent of the built-in transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Use a caller-supplied reqwest client.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(ReqwestTransport::from_client(client)))
    }

    /// Use a custom transport.
    ///
    /// Timeout and user agent settings only apply to the built-in transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        if self.max_retries == 0 {
            return Err(EvaluationError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }

        let base_url = https_base_url(&self.host)?;

        let mut default_headers = HeaderMap::new();
        if let Some(credentials) = &self.credentials {
            default_headers.insert(
                HeaderName::from_static(API_KEY_HEADER),
                header_value(API_KEY_HEADER, &credentials.api_key)?,
            );
            default_headers.insert(
                HeaderName::from_static(API_KEY_ID_HEADER),
                header_value(API_KEY_ID_HEADER, &credentials.api_key_id)?,
            );
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.settings)?),
        };

        Ok(ClientConfig {
            host: self.host,
            base_url,
            transport,
            retry: RetryConfig::constant(self.max_retries, self.retry_interval),
            credentials: self.credentials,
            default_headers,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| EvaluationError::Config(format!("{name} contains invalid characters")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EvaluationError::Config(format!("{name} has invalid value {raw:?}")))
}
