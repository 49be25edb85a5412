//! Bearer-token identity extraction.
//!
//! Handlers take a [`RequestIdentity`] and hand it to the domain as an
//! [`IdentitySource`]. A missing or unusable token yields an anonymous
//! identity; the services decide whether anonymous callers may proceed.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::ports::IdentitySource;
use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

/// Token carried by a `Bearer` credential. The scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

/// Acting identity resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestIdentity(Option<UserId>);

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }

    fn resolve(req: &HttpRequest) -> Result<Self, Error> {
        let Some(header) = req.headers().get(AUTHORIZATION) else {
            return Ok(Self::anonymous());
        };
        let Some(token) = header
            .to_str()
            .ok()
            .and_then(bearer_token)
        else {
            warn!("ignoring malformed authorization header");
            return Ok(Self::anonymous());
        };

        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
        match state.sessions.resolve(token) {
            Ok(id) => Ok(Self(Some(id))),
            Err(error) => {
                warn!(%error, "ignoring unusable session token");
                Ok(Self::anonymous())
            }
        }
    }
}

impl IdentitySource for RequestIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.0
    }
}

impl FromRequest for RequestIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::resolve(req).map_err(actix_web::Error::from))
    }
}
