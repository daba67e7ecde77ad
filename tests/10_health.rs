mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let shell = common::spawn_shell().await?;

    let res = shell.get("/health", None).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["sessions"], 0);
    assert!(body["data"]["backend"]
        .as_str()
        .unwrap_or_default()
        .starts_with(&shell.backend_url));
    Ok(())
}

#[tokio::test]
async fn providers_list_only_configured_oauth() -> Result<()> {
    let shell = common::spawn_shell_with(|config| {
        config.oauth.github_client_id = Some("gh-id".into());
        config.oauth.github_client_secret = Some("gh-secret".into());
        config.oauth.google_client_id = Some("only-half".into());
    })
    .await?;

    let body = shell
        .get("/api/auth/providers", None)
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(body["data"]["providers"], serde_json::json!(["credentials", "github"]));
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_input_and_bad_credentials() -> Result<()> {
    let shell = common::spawn_shell().await?;

    let res = shell
        .client
        .post(shell.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "not-an-email", "password": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["password"].is_string());

    let res = shell
        .client
        .post(shell.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "stranger@example.com", "password": "secret" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Invalid credentials");
    assert_eq!(body["redirect"], "/auth/login");
    Ok(())
}

#[tokio::test]
async fn logout_ends_the_session() -> Result<()> {
    let shell = common::spawn_shell().await?;
    let cookie = shell.login("admin@example.com").await?;

    assert_eq!(shell.get("/api/shell/profile", Some(&cookie)).await?.status(), StatusCode::OK);

    let res = shell
        .client
        .post(shell.url("/api/auth/logout"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cleared.contains("Max-Age=0"), "cookie not cleared: {}", cleared);
    assert_eq!(res.json::<serde_json::Value>().await?["data"]["signed_out"], true);

    assert_eq!(shell.get("/api/shell/profile", Some(&cookie)).await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
