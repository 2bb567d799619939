use axum::http::{Method, StatusCode, header};
use http_body_util::BodyExt;
use recipehub::email::Mailer;
use serde_json::json;
use temp_dir::TempDir;
use tower::ServiceExt;

mod helpers;

async fn register(router: &axum::Router, name: &str) -> serde_json::Value {
    let (status, body) = helpers::send(
        router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users",
            Some(json!({
                "name": name,
                "email": format!("{name}@recipehub.localhost"),
                "password": "my_password",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body
}

#[tokio::test]
async fn test_register_returns_the_user_without_its_hash() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    let user = register(&router, "john").await;

    assert_eq!(user["email"], "john@recipehub.localhost");
    assert_eq!(user["name"], "john");
    assert_eq!(user["is_active"], true);
    assert!(user.get("hashed_password").is_none());

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_duplicate_emails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    register(&router, "john").await;
    let (status, body) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users",
            Some(json!({"name": "Johnny", "email": "john@recipehub.localhost", "password": "other"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "Email already registered", "code": "bad_request"})
    );

    Ok(())
}

#[tokio::test]
async fn test_register_validates_the_email() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    let (status, _) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users",
            Some(json!({"name": "John", "email": "john", "password": "my_password"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn test_token_identifies_the_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));
    let user = register(&router, "john").await;

    let (status, body) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/token",
            Some(json!({"username": "john@recipehub.localhost", "password": "my_password"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().unwrap();
    let claims = helpers::jwt_keys().validate_token(token)?;
    assert_eq!(json!(claims.id), user["id"]);
    assert_eq!(claims.email, "john@recipehub.localhost");
    assert_eq!(claims.sub, "john@recipehub.localhost");
    assert!(claims.exp.is_some());

    let (status, body) = helpers::send(
        &router,
        helpers::bearer_request(Method::GET, "/api/v1/auth/users/me", token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "john@recipehub.localhost"}));

    Ok(())
}

#[tokio::test]
async fn test_token_rejects_bad_credentials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));
    register(&router, "john").await;

    for (username, password) in [
        ("john@recipehub.localhost", "wrong"),
        ("jane@recipehub.localhost", "my_password"),
    ] {
        let (status, body) = helpers::send(
            &router,
            helpers::json_request(
                Method::POST,
                "/api/v1/auth/token",
                Some(json!({"username": username, "password": password})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Incorrect username or password");
    }

    Ok(())
}

#[tokio::test]
async fn test_token_answers_malformed_bodies_with_json() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    let response = router
        .oneshot(helpers::json_request(
            Method::POST,
            "/api/v1/auth/token",
            Some(json!({"username": 1})),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let bytes = response.into_body().collect().await?.to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert!(body["detail"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_me_requires_a_token() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    let (status, body) = helpers::send(
        &router,
        helpers::json_request(Method::GET, "/api/v1/auth/users/me", None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"detail": "Not authenticated"}));

    Ok(())
}

#[tokio::test]
async fn test_otp_is_emailed_then_consumed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let mailer = Mailer::new_mock("email");
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, mailer.clone()));
    register(&router, "john").await;

    let (status, body) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/generate_otp",
            Some(json!({"email": "john@recipehub.localhost"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OTP sent to email"}));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "john@recipehub.localhost");

    let code = sent[0]
        .body
        .split_whitespace()
        .nth(4)
        .unwrap()
        .trim_end_matches('.')
        .to_owned();
    assert_eq!(code.len(), 6);

    let verify = || {
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/verify_otp",
            Some(json!({"email": "john@recipehub.localhost", "otp": code})),
        )
    };

    let (status, body) = helpers::send(&router, verify()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OTP verified successfully"}));

    let (status, body) = helpers::send(&router, verify()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid or expired OTP");

    Ok(())
}

#[tokio::test]
async fn test_otp_for_unknown_user_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let mailer = Mailer::new_mock("email");
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, mailer.clone()));

    let (status, body) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/generate_otp",
            Some(json!({"email": "ghost@recipehub.localhost"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
    assert!(mailer.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_otp_reports_unavailable_email_queue() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let mailer = Mailer::new(helpers::unreachable_queues(), "email");
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, mailer));
    register(&router, "john").await;

    let (status, body) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/generate_otp",
            Some(json!({"email": "john@recipehub.localhost"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Email service is unavailable");

    Ok(())
}

#[tokio::test]
async fn test_failed_email_keeps_the_previous_otp() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let mailer = Mailer::new_mock("email");
    let router = recipehub::routes::auth::router(helpers::auth_state(pool.clone(), mailer.clone()));
    let offline = recipehub::routes::auth::router(helpers::auth_state(
        pool,
        Mailer::new(helpers::unreachable_queues(), "email"),
    ));
    register(&router, "john").await;

    let generate = || {
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/generate_otp",
            Some(json!({"email": "john@recipehub.localhost"})),
        )
    };

    let (status, _) = helpers::send(&router, generate()).await;
    assert_eq!(status, StatusCode::OK);
    let code = mailer.sent()[0]
        .body
        .split_whitespace()
        .nth(4)
        .unwrap()
        .trim_end_matches('.')
        .to_owned();

    let (status, _) = helpers::send(&offline, generate()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = helpers::send(
        &router,
        helpers::json_request(
            Method::POST,
            "/api/v1/auth/users/verify_otp",
            Some(json!({"email": "john@recipehub.localhost", "otp": code})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_health_checks_the_database() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.path()).await?;
    let router = recipehub::routes::auth::router(helpers::auth_state(pool, Mailer::new_mock("email")));

    for uri in ["/health", "/api/v1"] {
        let (status, body) =
            helpers::send(&router, helpers::json_request(Method::GET, uri, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["dependencies"]["database"], "ok");
    }

    Ok(())
}
