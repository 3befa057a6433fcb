//! Application configuration loaded from environment variables.

use secrecy::SecretString;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: SQLite database (default: `"sqlite://newsletter.db?mode=rwc"`)
/// - `STATIC_DIR`: directory the site pages are served from (default: `"public"`)
/// - `SMTP_*`, `MAIL_FROM*`: outgoing mail, see [`SmtpConfig`]
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    pub static_dir: String,
    /// `None` when no SMTP account is configured.
    pub smtp: Option<SmtpConfig>,
}

/// SMTP account used for all outgoing mail.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Display name on the From header.
    pub from_name: String,
    pub from_address: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_name", &self.from_name)
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let smtp = get("SMTP_USERNAME").map(|username| SmtpConfig {
            host: get("SMTP_HOST").unwrap_or_else(|| "smtp.yandex.ru".to_string()),
            port: get("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            password: SecretString::from(get("SMTP_PASSWORD").unwrap_or_default()),
            from_name: get("MAIL_FROM_NAME").unwrap_or_else(|| "MOS".to_string()),
            from_address: get("MAIL_FROM").unwrap_or_else(|| username.clone()),
            username,
        });

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
            smtp,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: "sqlite://newsletter.db?mode=rwc".to_string(),
            static_dir: "public".to_string(),
            smtp: None,
        }
    }
}
