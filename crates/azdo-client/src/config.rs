//! Connection settings for the Azure DevOps organisation.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Environment variable naming the organisation URL, e.g. `https://dev.azure.com/contoso`.
pub const ORG_SERVICE_URL_ENV: &str = "AZDO_ORG_SERVICE_URL";

/// Environment variable holding the organisation personal access token.
pub const PERSONAL_ACCESS_TOKEN_ENV: &str = "AZDO_PERSONAL_ACCESS_TOKEN";

/// Environment variable overriding the REST API version.
pub const API_VERSION_ENV: &str = "AZDO_API_VERSION";

/// Environment variable overriding the request timeout, in whole seconds.
pub const HTTP_TIMEOUT_ENV: &str = "AZDO_HTTP_TIMEOUT_SECS";

/// API version of the service endpoint routes this adapter speaks.
pub const DEFAULT_API_VERSION: &str = "5.1-preview.2";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while assembling [`AzureDevOpsConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable or value is unset or empty.
    #[error("{0} is not set")]
    MissingVariable(&'static str),

    /// The organisation URL is not an absolute `http(s)` URL.
    #[error("invalid organisation URL '{url}': {message}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// An optional setting could not be parsed.
    #[error("invalid value '{value}' for {variable}")]
    InvalidValue {
        /// Variable or flag name.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Organisation URL, credentials, and transport settings.
#[derive(Clone)]
pub struct AzureDevOpsConfig {
    organization_url: Url,
    personal_access_token: String,
    api_version: String,
    timeout: Duration,
}

impl AzureDevOpsConfig {
    /// Creates a configuration with the default API version and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when `organization_url` is not an
    /// absolute `http(s)` URL, and [`ConfigError::MissingVariable`] when the
    /// token is empty.
    pub fn new(
        organization_url: &str,
        personal_access_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let url = Url::parse(organization_url).map_err(|e| ConfigError::InvalidUrl {
            url: organization_url.to_owned(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: organization_url.to_owned(),
                message: "expected an http(s) organisation URL".to_owned(),
            });
        }

        let personal_access_token = personal_access_token.into();
        if personal_access_token.is_empty() {
            return Err(ConfigError::MissingVariable(PERSONAL_ACCESS_TOKEN_ENV));
        }

        Ok(Self {
            organization_url: url,
            personal_access_token,
            api_version: DEFAULT_API_VERSION.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Loads the configuration from the `AZDO_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] when a required variable is
    /// unset and [`ConfigError::InvalidValue`] for an unparsable timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let url = var(ORG_SERVICE_URL_ENV).ok_or(ConfigError::MissingVariable(ORG_SERVICE_URL_ENV))?;
        let token = var(PERSONAL_ACCESS_TOKEN_ENV)
            .ok_or(ConfigError::MissingVariable(PERSONAL_ACCESS_TOKEN_ENV))?;

        let mut config = Self::new(&url, token)?;
        if let Some(version) = var(API_VERSION_ENV) {
            config = config.with_api_version(version);
        }
        if let Some(raw) = var(HTTP_TIMEOUT_ENV) {
            let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                variable: HTTP_TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn organization_url(&self) -> &Url {
        &self.organization_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn personal_access_token(&self) -> &str {
        &self.personal_access_token
    }
}

impl std::fmt::Debug for AzureDevOpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsConfig")
            .field("organization_url", &self.organization_url.as_str())
            .field("personal_access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
