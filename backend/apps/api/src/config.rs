//! Server Configuration
//!
//! Everything comes from environment variables (after `.env` is loaded).
//! Production refuses to start without explicit token secrets.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use feed::FeedConfig;
use platform::mail::RelayConfig;
use platform::token::TokenSecrets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub env: AppEnv,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub feed: FeedConfig,
    /// `None` selects the log-only mailer
    pub mail_relay: Option<RelayConfig>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let env = match var("APP_ENV").as_deref() {
            None | Some("development") => AppEnv::Development,
            Some("production") => AppEnv::Production,
            Some(other) => bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {v}"))?,
            None => 5,
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let mut auth = match env {
            AppEnv::Production => AuthConfig::default(),
            AppEnv::Development => AuthConfig::development(),
        };

        match (var("ACCESS_TOKEN_SECRET"), var("REFRESH_TOKEN_SECRET")) {
            (Some(access), Some(refresh)) => {
                if access == refresh {
                    bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
                }
                auth.token_secrets = TokenSecrets::new(access, refresh);
            }
            _ if env == AppEnv::Production => {
                bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must be set in production")
            }
            _ => tracing::warn!("Token secrets not set, using random ones"),
        }

        auth.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        if let Some(v) = var("PASSWORD_MIN_LENGTH") {
            auth.password_policy.min_length = v
                .parse()
                .with_context(|| format!("PASSWORD_MIN_LENGTH is not a number: {v}"))?;
        }
        if let Some(v) = var("PASSWORD_REJECT_COMMON") {
            auth.password_policy.reject_common = match v.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => bail!("PASSWORD_REJECT_COMMON must be true or false, got '{other}'"),
            };
        }
        if let Some(url) = var("PUBLIC_BACKEND_URL") {
            auth.public_backend_url = url;
        }
        if let Some(url) = var("PUBLIC_FRONTEND_URL") {
            auth.public_frontend_url = url;
        }

        let mail_relay = match (var("MAIL_RELAY_URL"), var("MAIL_RELAY_API_KEY")) {
            (Some(url), Some(api_key)) => Some(RelayConfig {
                url,
                api_key,
                from: var("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            env,
            database_url,
            database_max_connections,
            database_acquire_timeout: Duration::from_secs(5),
            bind_addr,
            auth,
            feed: match env {
                AppEnv::Production => FeedConfig::default(),
                AppEnv::Development => FeedConfig::development(),
            },
            mail_relay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/twilight")]).unwrap();

        assert_eq!(config.env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.auth.public_frontend_url, "http://localhost:5173");
        assert_eq!(config.auth.password_policy.min_length, 1);
        assert!(!config.auth.password_policy.reject_common);
        assert!(config.mail_relay.is_none());
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn test_production_requires_secrets() {
        let base = [
            ("DATABASE_URL", "postgres://db/twilight"),
            ("APP_ENV", "production"),
        ];
        assert!(load(&base).is_err());

        let same = [
            base[0],
            base[1],
            ("ACCESS_TOKEN_SECRET", "s"),
            ("REFRESH_TOKEN_SECRET", "s"),
        ];
        assert!(load(&same).is_err());

        let config = load(&[
            base[0],
            base[1],
            ("ACCESS_TOKEN_SECRET", "access"),
            ("REFRESH_TOKEN_SECRET", "refresh"),
        ])
        .unwrap();
        assert_eq!(config.env, AppEnv::Production);
        assert!(config.auth.cookie_secure);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/twilight"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("PASSWORD_MIN_LENGTH", "8"),
            ("PASSWORD_REJECT_COMMON", "true"),
            ("PASSWORD_PEPPER", "pepper"),
            ("PUBLIC_FRONTEND_URL", "https://twilight.example"),
            ("MAIL_RELAY_URL", "https://relay.example/send"),
            ("MAIL_RELAY_API_KEY", "key"),
        ])
        .unwrap();

        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.auth.password_policy.min_length, 8);
        assert!(config.auth.password_policy.reject_common);
        assert_eq!(config.auth.pepper(), Some(&b"pepper"[..]));
        assert_eq!(config.auth.public_frontend_url, "https://twilight.example");
        assert_eq!(
            config.mail_relay.map(|r| r.from),
            Some("no-reply@localhost".to_string())
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("DATABASE_URL", "x"), ("APP_ENV", "staging")]).is_err());
        assert!(load(&[("DATABASE_URL", "x"), ("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert!(load(&[("DATABASE_URL", "x"), ("BIND_ADDR", "nowhere")]).is_err());
        assert!(load(&[("DATABASE_URL", "x"), ("PASSWORD_REJECT_COMMON", "maybe")]).is_err());
    }
}
