//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"name":"ada","password":"correct horse"}
//! GET /api/v1/users/{id}
//! PATCH /api/v1/users/{id} {"name":"ada-l"}
//! DELETE /api/v1/users/{id}
//! POST /api/v1/login {"username":"ada","password":"correct horse"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{LoginCredentials, LoginValidationError, SessionToken, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::RequestIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id};

const USER_ID: FieldName = FieldName::new("id");

/// Registration body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub name: String,
    pub password: String,
}

/// Partial update body for `PATCH /api/v1/users/{id}`.
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Public view of a user. The password hash never leaves the domain.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
        }
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionToken> for LoginResponse {
    fn from(session: SessionToken) -> Self {
        Self {
            token: session.token().to_owned(),
            expires_at: session.expires_at(),
        }
    }
}

/// Register a new user. Open to anonymous callers.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user = state
        .users
        .create(CreateUserRequest {
            name: body.name,
            password: Zeroizing::new(body.password),
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_path_id(USER_ID, &path)?;
    let user = state.users.get_self(&identity, &id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_path_id(USER_ID, &path)?;
    let body = payload.into_inner();
    let request = UpdateUserRequest {
        name: body.name,
        password: body.password.map(Zeroizing::new),
    };
    let user = state.users.update_self(&identity, &id, request).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete the caller's own account. Refused while they still own bank
/// accounts.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_path_id(USER_ID, &path)?;
    state.users.delete_self(&identity, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Exchange credentials for a bearer token.
///
/// Unknown users and wrong passwords produce the same response body.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(LoginValidationError::into_error)?;
    let session = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse::from(session)))
}
