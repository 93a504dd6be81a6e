use std::env;

/// Environment variable holding the carrier account identifier.
pub const ENV_ACCOUNT_ID: &str = "COURIER_CARRIER_ACCOUNT_ID";

/// Environment variable holding the carrier auth token.
pub const ENV_AUTH_TOKEN: &str = "COURIER_CARRIER_AUTH_TOKEN";

/// Configuration for the HTTP carrier transport.
#[derive(Clone)]
pub struct CarrierConfig {
    /// Carrier account identifier used to authenticate API requests.
    pub account_id: String,

    /// Carrier auth token used for HTTP Basic authentication.
    pub auth_token: String,

    /// Base URL for the carrier REST API. Override this for testing against
    /// a mock server.
    pub api_base_url: String,
}

impl std::fmt::Debug for CarrierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierConfig")
            .field("account_id", &self.account_id)
            .field("auth_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl CarrierConfig {
    /// Create a new configuration with the given account id and auth token.
    ///
    /// Uses the default carrier API base URL (`https://api.twilio.com`).
    pub fn new(account_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            auth_token: auth_token.into(),
            api_base_url: "https://api.twilio.com".to_owned(),
        }
    }

    /// Read credentials from the environment.
    ///
    /// Returns `None` when either variable is absent, in which case the
    /// gateway should be built without a transport and will report itself
    /// as not configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let account_id = env::var(ENV_ACCOUNT_ID).ok()?;
        let auth_token = env::var(ENV_AUTH_TOKEN).ok()?;
        Some(Self::new(account_id, auth_token))
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
