//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `LEDGER_*` environment variables, CLI flags, or a config
//! file. The session signing secret is resolved here so the server only sees
//! validated [`JwtSettings`].

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::security::JwtSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "ledger-backend";
const DEFAULT_AUDIENCE: &str = "ledger-api";
const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and mint an ephemeral one.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// ```rust
    /// use backend::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to read session secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    #[error("a session secret is required in release builds")]
    MissingSecret,
    #[error("token TTL must be at least one minute")]
    InvalidTtl,
}

/// Configuration values for the HTTP server and session tokens.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEDGER")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Inline HS256 signing secret.
    pub session_secret: Option<String>,
    /// File holding the signing secret. Ignored when `session_secret` is set.
    pub session_secret_file: Option<PathBuf>,
    pub token_issuer: Option<String>,
    pub token_audience: Option<String>,
    /// Lifetime of issued session tokens.
    #[ortho_config(default = 30)]
    pub token_ttl_minutes: u32,
}

impl AppSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Token signing settings with the secret resolved for `mode`.
    pub fn jwt_settings(&self, mode: BuildMode) -> Result<JwtSettings, SettingsError> {
        if self.token_ttl_minutes == 0 {
            return Err(SettingsError::InvalidTtl);
        }
        Ok(JwtSettings {
            secret: self.session_secret(mode)?,
            issuer: self
                .token_issuer
                .clone()
                .unwrap_or_else(|| DEFAULT_ISSUER.to_owned()),
            audience: self
                .token_audience
                .clone()
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_owned()),
            ttl: TimeDelta::minutes(i64::from(self.token_ttl_minutes)),
        })
    }

    fn session_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        let secret = if let Some(inline) = self.session_secret.as_deref() {
            Zeroizing::new(inline.as_bytes().to_vec())
        } else if let Some(path) = self.session_secret_file.as_ref() {
            std::fs::read(path)
                .map(Zeroizing::new)
                .map_err(|source| SettingsError::SecretRead {
                    path: path.clone(),
                    source,
                })?
        } else if mode == BuildMode::Debug {
            warn!("no session secret configured; using an ephemeral secret (dev only)");
            let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
            OsRng.fill_bytes(&mut secret);
            return Ok(secret);
        } else {
            return Err(SettingsError::MissingSecret);
        };

        if secret.len() < SECRET_MIN_LEN {
            if mode == BuildMode::Release {
                return Err(SettingsError::SecretTooShort {
                    length: secret.len(),
                    min_len: SECRET_MIN_LEN,
                });
            }
            warn!(length = secret.len(), "session secret is shorter than recommended");
        }
        Ok(secret)
    }
}
