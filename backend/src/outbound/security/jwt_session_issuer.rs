//! HS256 JSON Web Token implementation of the `SessionIssuer` port.
//!
//! Tokens carry the user id as `sub`, a random `jti`, and `iat`/`exp` taken
//! from the injected clock. Expiry is enforced on resolve against wall-clock
//! time with no leeway.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{SessionIssuer, SessionIssuerError};
use crate::domain::{SessionToken, UserId};

/// Signing material and claim values for issued tokens.
pub struct JwtSettings {
    pub secret: Zeroizing<Vec<u8>>,
    pub issuer: String,
    pub audience: String,
    pub ttl: TimeDelta,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    jti: String,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

/// Issues and resolves signed session tokens.
pub struct JwtSessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtSessionIssuer {
    pub fn new(settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(&settings.secret),
            decoding: DecodingKey::from_secret(&settings.secret),
            validation,
            issuer: settings.issuer,
            audience: settings.audience,
            ttl: settings.ttl,
            clock,
        }
    }

    fn expiry_from(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, SessionIssuerError> {
        issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionIssuerError::signing("token expiry out of range"))
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionIssuerError> {
        let issued_at = self.clock.utc();
        let expires_at = self.expiry_from(issued_at)?;
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| SessionIssuerError::signing(err.to_string()))?;
        Ok(SessionToken::new(token, expires_at))
    }

    fn resolve(&self, token: &str) -> Result<UserId, SessionIssuerError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| SessionIssuerError::rejected(err.to_string()))?;
        UserId::new(&data.claims.sub).map_err(|err| SessionIssuerError::rejected(err.to_string()))
    }
}
