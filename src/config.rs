// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup and passed
//! down through [`AppState`](crate::state::AppState).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC secret for bearer tokens | Required |
//! | `JWT_EXPIRES_IN_SECS` | Token lifetime | `2592000` (30 days) |
//! | `PAGE_LIMIT_MAX` | Upper bound for `limit` on list endpoints | `100` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; both set enables HTTPS | Unset |
//! | `SEED_ADMIN_EMAIL` / `SEED_ADMIN_PASSWORD` | Admin account created at startup | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// HMAC secret for signing and verifying tokens.
///
/// There is no production default. Builds with the `dev` feature fall back
/// to [`DEV_JWT_SECRET`] and log a warning.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN_SECS";
pub const PAGE_LIMIT_MAX_ENV: &str = "PAGE_LIMIT_MAX";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[cfg(feature = "dev")]
pub const DEV_JWT_SECRET: &str = "secret123";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_PAGE_LIMIT_MAX: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

/// PEM certificate chain and private key locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Admin account created at startup if absent.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub page_limit_max: u64,
    pub tls: Option<TlsPaths>,
    pub admin_seed: Option<AdminSeed>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("page_limit_max", &self.page_limit_max)
            .field("tls", &self.tls)
            .field("admin_seed", &self.admin_seed)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let token_ttl_secs = parse_or(
            get(JWT_EXPIRES_IN_ENV),
            JWT_EXPIRES_IN_ENV,
            DEFAULT_TOKEN_TTL_SECS,
        )?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: JWT_EXPIRES_IN_ENV,
                value: token_ttl_secs.to_string(),
            });
        }
        let page_limit_max = parse_or(
            get(PAGE_LIMIT_MAX_ENV),
            PAGE_LIMIT_MAX_ENV,
            DEFAULT_PAGE_LIMIT_MAX,
        )?;
        if page_limit_max == 0 {
            return Err(ConfigError::Invalid {
                name: PAGE_LIMIT_MAX_ENV,
                value: "0".to_string(),
            });
        }

        let jwt_secret = match get(JWT_SECRET_ENV) {
            Some(secret) => secret,
            None => fallback_secret()?,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        let admin_seed = match (get(SEED_ADMIN_EMAIL_ENV), get(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_ADMIN_EMAIL_ENV)),
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            page_limit_max,
            tls,
            admin_seed,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(default),
    }
}

#[cfg(feature = "dev")]
fn fallback_secret() -> Result<String, ConfigError> {
    tracing::warn!(
        env = JWT_SECRET_ENV,
        "Signing secret not set, using the development secret. Never run this in production"
    );
    Ok(DEV_JWT_SECRET.to_string())
}

#[cfg(not(feature = "dev"))]
fn fallback_secret() -> Result<String, ConfigError> {
    Err(ConfigError::Missing(JWT_SECRET_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_secs, 2_592_000);
        assert_eq!(config.page_limit_max, 100);
        assert!(config.tls.is_none());
        assert!(config.admin_seed.is_none());
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[cfg(not(feature = "dev"))]
    #[test]
    fn secret_is_required() {
        assert_eq!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV)));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: PORT_ENV,
                value: "eighty".into()
            }
        );
        assert!(load(&[(JWT_SECRET_ENV, "s"), (PAGE_LIMIT_MAX_ENV, "0")]).is_err());
    }

    #[test]
    fn tls_needs_both_paths() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (TLS_CERT_PATH_ENV, "/tmp/cert.pem")]).unwrap_err();
        assert_eq!(err, ConfigError::PartialTls);

        let config = load(&[
            (JWT_SECRET_ENV, "s"),
            (TLS_CERT_PATH_ENV, "/tmp/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tmp/key.pem"),
        ])
        .unwrap();
        assert_eq!(config.tls.unwrap().key, PathBuf::from("/tmp/key.pem"));
    }

    #[test]
    fn debug_hides_secrets() {
        let config = load(&[
            (JWT_SECRET_ENV, "top-secret-value"),
            (SEED_ADMIN_EMAIL_ENV, "root@example.com"),
            (SEED_ADMIN_PASSWORD_ENV, "hunter22"),
        ])
        .unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("top-secret-value"));
        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("root@example.com"));
    }
}
