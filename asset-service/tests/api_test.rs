mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body must be JSON")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "asset-service");

    app.cleanup().await;
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/organization/getAllOrganizations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);

    app.cleanup().await;
}

#[tokio::test]
async fn login_then_crud_round_trip_over_http() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let login = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": seeded.user.email, "password": "password1234" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);

    let body = body_json(login).await;
    assert_eq!(body["success"], true);
    let access_token = body["data"]["tokens"]["accessToken"]
        .as_str()
        .expect("Login must return an access token")
        .to_string();
    // The password hash never leaves the service.
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let created = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/organization/createOrganization")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                .body(Body::from(
                    json!({ "organizationName": "Globex" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let body = body_json(created).await;
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["data"]["organizationName"], "Globex");

    let listed = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/organization/getAllOrganizations")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);

    let body = body_json(listed).await;
    assert_eq!(body["mode"], "pagination");
    assert_eq!(body["totalData"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);

    app.cleanup().await;
}

#[tokio::test]
async fn validation_failures_are_unprocessable() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let (_, tokens) = app
        .state
        .auth
        .login(&seeded.user.email, "password1234")
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/organization/createOrganization")
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", tokens.access_token),
                )
                .body(Body::from(json!({ "organizationName": "" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 422);

    app.cleanup().await;
}
