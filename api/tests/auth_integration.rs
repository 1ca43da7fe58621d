//! End-to-end tests for the auth endpoints, the JWT guard, and the
//! realtime channel, run against the full application factory.

use std::sync::Arc;

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web, Error, HttpResponse,
};
use chrono::{DateTime, Duration, Utc};

use pb_api::app::create_app;
use pb_api::middleware::auth::TOKEN_EXPIRED_HEADER;
use pb_api::routes::AppState;
use pb_core::domain::token::Claims;
use pb_core::hub::BroadcastHub;
use pb_core::services::auth::{AuthService, StaticCredentials};
use pb_core::services::dashboard::DashboardService;
use pb_core::services::token::{TokenCodec, TokenService};
use pb_shared::config::{AuthConfig, DashboardConfig};

const API_KEY: &str = "integration-api-key";
const SECRET: &str = "integration-secret";

fn auth_config() -> AuthConfig {
    AuthConfig::new(SECRET).with_api_key(API_KEY)
}

fn test_state() -> web::Data<AppState<StaticCredentials>> {
    let token_service = Arc::new(TokenService::new(auth_config()));
    let auth_service = Arc::new(AuthService::new(
        StaticCredentials,
        Arc::clone(&token_service),
        API_KEY,
    ));
    let hub = Arc::new(BroadcastHub::new());
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&hub),
        DashboardConfig::default(),
    ));

    web::Data::new(AppState {
        auth_service,
        token_service,
        dashboard_service,
        hub,
    })
}

/// Like `test::call_service`, but renders service-level errors (e.g. from
/// middleware) into their HTTP error responses instead of panicking.
async fn call_rendering_errors<S, R, B>(app: &S, req: R) -> HttpResponse<BoxBody>
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody + 'static,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.map_into_boxed_body().into_parts().1,
        Err(err) => err.error_response(),
    }
}

/// Signs arbitrary claims with the test secret, bypassing the service.
fn sign(claims: &Claims) -> String {
    TokenCodec::new(&auth_config()).encode(claims).unwrap()
}

#[actix_rt::test]
async fn login_with_demo_credentials_returns_token() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({"username": "admin", "password": "1234"}))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    let expires_at: DateTime<Utc> = body["expiresAt"].as_str().unwrap().parse().unwrap();
    let delta = (expires_at - (Utc::now() + Duration::minutes(30)))
        .num_seconds()
        .abs();
    assert!(delta <= 5, "expiresAt drifted by {delta}s");
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({"username": "admin", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(TOKEN_EXPIRED_HEADER).is_none());
}

#[actix_rt::test]
async fn refresh_exchanges_a_valid_token() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({"username": "user", "password": "1234"}))
        .to_request();
    let login: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(serde_json::json!({"token": login["token"]}))
        .to_request();
    let refreshed: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert!(!refreshed["token"].as_str().unwrap().is_empty());
}

#[actix_rt::test]
async fn refresh_with_empty_token_is_bad_request() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(serde_json::json!({"token": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn refresh_with_garbage_token_is_bad_request() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(serde_json::json!({"token": "not.a.token"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn generate_token_with_bad_api_key_is_unauthorized() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    // Every other header is valid; the key mismatch must still win.
    let req = test::TestRequest::post()
        .uri("/api/auth/generate-token")
        .insert_header(("username", "svc"))
        .insert_header(("email", "svc@example.com"))
        .insert_header(("mobileNo", "09123456789"))
        .insert_header(("role", "User"))
        .insert_header(("ApiKey", "not-the-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn generate_token_with_missing_field_is_bad_request() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/generate-token")
        .insert_header(("username", "svc"))
        .insert_header(("mobileNo", "09123456789"))
        .insert_header(("role", "User"))
        .insert_header(("ApiKey", API_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn generate_token_with_valid_headers_succeeds() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/generate-token")
        .insert_header(("username", "svc"))
        .insert_header(("email", "svc@example.com"))
        .insert_header(("mobileNo", "09123456789"))
        .insert_header(("role", "Guest"))
        .insert_header(("ApiKey", API_KEY))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[actix_rt::test]
async fn guarded_route_without_token_is_unauthorized() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh")
        .to_request();
    let resp = call_rendering_errors(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(TOKEN_EXPIRED_HEADER).is_none());
}

#[actix_rt::test]
async fn guarded_route_with_valid_token_succeeds() {
    let state = test_state();
    let app = test::init_service(create_app(state.clone(), Vec::new())).await;

    let issued = state.auth_service.login("admin", "1234").await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh")
        .insert_header(("Authorization", format!("Bearer {}", issued.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn expired_token_gets_the_expiry_signal_header() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let config = auth_config();
    let mut claims = Claims::new(
        "admin",
        "Admin",
        None,
        None,
        30,
        &config.issuer,
        &config.audience,
    );
    claims.exp = Utc::now().timestamp() - 60;

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh")
        .insert_header(("Authorization", format!("Bearer {}", sign(&claims))))
        .to_request();
    let resp = call_rendering_errors(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get(TOKEN_EXPIRED_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[actix_rt::test]
async fn tampered_token_does_not_get_the_expiry_signal() {
    let app = test::init_service(create_app(test_state(), Vec::new())).await;

    let foreign = TokenCodec::new(&AuthConfig::new("some-other-secret"));
    let config = auth_config();
    let claims = Claims::new(
        "admin",
        "Admin",
        None,
        None,
        30,
        &config.issuer,
        &config.audience,
    );
    let token = foreign.encode(&claims).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = call_rendering_errors(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(TOKEN_EXPIRED_HEADER).is_none());
}

#[actix_rt::test]
async fn hub_endpoint_registers_and_unregisters_connections() {
    let state = test_state();
    let app = test::init_service(create_app(state.clone(), Vec::new())).await;

    let req = test::TestRequest::get().uri("/hubs/dashboard").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/event-stream")
    );
    assert_eq!(state.hub.connection_count(), 1);

    // Dropping the response drops the stream, which deregisters.
    drop(resp);
    assert_eq!(state.hub.connection_count(), 0);
}
