mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use equipment_back::models::UserRole;
use serde_json::Value;
use tower::ServiceExt;

use common::{BACKEND_URL, CLIENT_URL, SUPABASE_URL, session_cookie, test_app};

fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    if builder.method_ref() == Some(&Method::GET) || builder.method_ref() == Some(&Method::DELETE) {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    for (method, uri) in [
        (Method::GET, "/equipment/1/stats"),
        (Method::POST, "/equipment"),
        (Method::PUT, "/equipment/1"),
        (Method::DELETE, "/equipment/1"),
        (Method::GET, "/analytics/dashboard"),
    ] {
        let (app, _) = test_app();
        let response = app.oneshot(request(method, uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(json_body(response).await["error"], "Authentication required");
    }
}

#[tokio::test]
async fn admin_routes_reject_invalid_tokens() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(
            Method::GET,
            "/equipment/1/stats",
            Some("session=not-a-token"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Invalid session");
}

#[tokio::test]
async fn admin_routes_forbid_regular_users() {
    for (method, uri) in [
        (Method::GET, "/equipment/1/stats"),
        (Method::POST, "/equipment"),
        (Method::DELETE, "/equipment/1"),
        (Method::GET, "/analytics/dashboard"),
    ] {
        let (app, state) = test_app();
        let cookie = session_cookie(&state, UserRole::User);
        let response = app
            .oneshot(request(method, uri, Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(json_body(response).await["error"], "Admin access required");
    }
}

#[tokio::test]
async fn bearer_header_is_accepted_for_admin_routes() {
    let (app, state) = test_app();
    let cookie = session_cookie(&state, UserRole::User);
    let token = cookie.trim_start_matches("session=");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/analytics/dashboard")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboard_falls_back_to_empty_stats_without_database() {
    let (app, state) = test_app();
    let cookie = session_cookie(&state, UserRole::Admin);

    let response = app
        .oneshot(request(Method::GET, "/analytics/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["totalProducts"], 0);
    assert_eq!(body["popularProducts"], serde_json::json!([]));
}

#[tokio::test]
async fn user_routes_require_a_session() {
    for (method, uri) in [
        (Method::GET, "/user/cart"),
        (Method::DELETE, "/user/cart"),
        (Method::GET, "/user/favorites"),
        (Method::POST, "/user/favorites/3"),
    ] {
        let (app, _) = test_app();
        let response = app.oneshot(request(method, uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn auth_check_without_session_is_unauthorized_payload() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/auth/check", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["authorized"], false);
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn auth_check_with_session_returns_user() {
    let (app, state) = test_app();
    let cookie = session_cookie(&state, UserRole::Admin);

    let response = app
        .oneshot(request(Method::GET, "/auth/check", Some(&cookie)))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["authorized"], true);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/auth/logout", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("session=;"));
    assert!(cookies[0].contains("Max-Age=0"));
    assert!(cookies[0].contains("HttpOnly"));
    assert_eq!(json_body(response).await["message"], "Logged out");
}

#[tokio::test]
async fn google_login_redirects_with_pkce_challenge() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/auth/google", None))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("{SUPABASE_URL}/auth/v1/authorize?provider=google")));
    assert!(location.contains("code_challenge_method=s256"));
    assert!(location.contains(&url_encoded(&format!("{BACKEND_URL}/auth/google/callback"))));

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("oauth_verifier="));
    assert!(cookies[0].contains("Path=/auth"));
}

#[tokio::test]
async fn google_callback_without_code_redirects_to_login() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/auth/google/callback", None))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response.headers().get(header::LOCATION).unwrap();
    assert!(
        location
            .to_str()
            .unwrap()
            .starts_with(&format!("{CLIENT_URL}/login?error="))
    );
}

#[tokio::test]
async fn google_callback_provider_error_is_forwarded() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(
            Method::GET,
            "/auth/google/callback?error=access_denied",
            None,
        ))
        .await
        .unwrap();

    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(
        location.to_str().unwrap(),
        format!("{CLIENT_URL}/login?error=access_denied")
    );
}

#[tokio::test]
async fn login_rejects_blank_credentials() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::POST, "/auth/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Email and password are required"
    );
}

#[tokio::test]
async fn track_view_requires_equipment_id() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::POST, "/analytics/view", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "equipment_id is required");
}

#[tokio::test]
async fn cart_add_accepts_a_bodiless_request() {
    let (app, state) = test_app();
    let cookie = session_cookie(&state, UserRole::User);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/user/cart/5")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Gets past body parsing and quantity validation; only the missing database stops it.
    assert_ne!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_ne!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Database error");
}

#[tokio::test]
async fn cart_add_rejects_oversized_quantity() {
    let (app, state) = test_app();
    let cookie = session_cookie(&state, UserRole::User);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/user/cart/5")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"quantity": 2147483647}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn url_encoded(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[tokio::test]
async fn readiness_reports_unreachable_database() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/health/ready", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["database"], "unreachable");
}
