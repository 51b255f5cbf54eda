use {
    crate::domain::error::OplatiError,
    std::{env, fmt, time::Duration},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Gateway base URL, e.g. `https://oplati-cashboxapi.lwo-dev.by/ms-pay`.
    pub base_url: String,
    /// Cashbox registration number, e.g. `OPL000011111`.
    pub reg_num: String,
    /// Internet cashbox password.
    pub password: String,
    /// Deadline for one request/response exchange.
    pub timeout: Duration,
    /// Replaces the internally built HTTP client (TLS, proxy, pool settings).
    /// `timeout` is still applied to every request.
    pub http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        reg_num: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            reg_num: reg_num.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Reads `OPLATI_BASE_URL`, `OPLATI_REG_NUM`, `OPLATI_PASSWORD` and the
    /// optional `OPLATI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, OplatiError> {
        let mut config = Self::new(
            required_var("OPLATI_BASE_URL")?,
            required_var("OPLATI_REG_NUM")?,
            required_var("OPLATI_PASSWORD")?,
        );
        if let Ok(raw) = env::var("OPLATI_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                OplatiError::Validation(format!("OPLATI_TIMEOUT_SECS must be an integer, got: {raw}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OplatiError> {
        for (name, value) in [
            ("base_url", &self.base_url),
            ("reg_num", &self.reg_num),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(OplatiError::Validation(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("reg_num", &self.reg_num)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

fn required_var(name: &str) -> Result<String, OplatiError> {
    env::var(name).map_err(|_| OplatiError::Validation(format!("{name} must be set")))
}
