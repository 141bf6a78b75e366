use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// SMTP mailer configuration (password-reset OTP delivery).
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub use_tls: bool,
}

impl FromEnv for SmtpConfig {
    /// Environment variables:
    /// - `SMTP_HOST` (required)
    /// - `SMTP_PORT` (optional, default: 587)
    /// - `SMTP_USERNAME` / `SMTP_PASSWORD` (optional; empty = no auth, for Mailpit)
    /// - `SMTP_FROM_EMAIL` (required)
    /// - `SMTP_FROM_NAME` (optional, default: "LiveScan Billing")
    /// - `SMTP_USE_TLS` (optional, default: true)
    fn from_env() -> Result<Self, ConfigError> {
        let port = env_or_default("SMTP_PORT", "587")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "SMTP_PORT".to_string(),
                details: format!("{}", e),
            })?;

        let use_tls = env_or_default("SMTP_USE_TLS", "true")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "SMTP_USE_TLS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            host: env_required("SMTP_HOST")?,
            port,
            username: env_or_default("SMTP_USERNAME", ""),
            password: env_or_default("SMTP_PASSWORD", ""),
            from_email: env_required("SMTP_FROM_EMAIL")?,
            from_name: env_or_default("SMTP_FROM_NAME", "LiveScan Billing"),
            use_tls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_config_defaults() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("localhost")),
                ("SMTP_FROM_EMAIL", Some("billing@example.com")),
                ("SMTP_PORT", None),
                ("SMTP_USE_TLS", None),
            ],
            || {
                let config = SmtpConfig::from_env().unwrap();
                assert_eq!(config.port, 587);
                assert!(config.use_tls);
                assert_eq!(config.from_name, "LiveScan Billing");
            },
        );
    }

    #[test]
    fn test_smtp_config_invalid_port() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("localhost")),
                ("SMTP_FROM_EMAIL", Some("billing@example.com")),
                ("SMTP_PORT", Some("nope")),
            ],
            || {
                assert!(SmtpConfig::from_env().is_err());
            },
        );
    }
}
