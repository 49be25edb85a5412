//! Shared HTTP helpers for end-to-end tests.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use serde_json::{Value, json};

/// Status, body, and `trace-id` header captured from a response.
#[derive(Debug)]
pub struct Snapshot {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
}

pub async fn send<S>(app: &S, request: Request) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(backend::domain::TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Snapshot {
        status,
        body,
        trace_id,
    }
}

pub fn with_token(request: actix_test::TestRequest, token: Option<&str>) -> Request {
    match token {
        Some(token) => request
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
        None => request.to_request(),
    }
}

/// Register a user and return its id.
pub async fn register<S>(app: &S, name: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "name": name, "password": password }))
        .to_request();
    let snapshot = send(app, request).await;
    assert_eq!(snapshot.status, StatusCode::CREATED, "{:?}", snapshot.body);
    snapshot.body["id"]
        .as_str()
        .expect("user id in body")
        .to_owned()
}

pub async fn login<S>(app: &S, name: &str, password: &str) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": name, "password": password }))
        .to_request();
    send(app, request).await
}

/// Log in and return the bearer token.
pub async fn token_for<S>(app: &S, name: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let snapshot = login(app, name, password).await;
    assert_eq!(snapshot.status, StatusCode::OK, "{:?}", snapshot.body);
    snapshot.body["token"]
        .as_str()
        .expect("token in body")
        .to_owned()
}
