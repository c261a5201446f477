use analytics::{AuthError, Credentials, Error};
use axum::http::StatusCode;
use integration_tests::*;
use secrecy::SecretString;
use serde_json::json;

#[tokio::test]
async fn valid_credentials_fetch_metrics() {
    let zoom = ZoomMock::new()
        .with_pages(vec![vec![
            json!({ "queue_id": "42", "queue_name": "Support Kobe", "avg_handle_time": 240 }),
            json!({ "id": 7, "name": "Sales", "average_handle_time": "90.5" }),
            json!({ "queue_id": "9", "queue_name": "Billing" }),
        ]])
        .spawn()
        .await;

    let metrics = zoom.orchestrator("").run(&credentials(), &window()).await.unwrap();

    insta::assert_json_snapshot!(metrics, @r#"
    [
      {
        "queue_id": "42",
        "queue_name": "Support Kobe",
        "avg_handle_time_seconds": 240.0
      },
      {
        "queue_id": "7",
        "queue_name": "Sales",
        "avg_handle_time_seconds": 90.5
      }
    ]
    "#);

    assert_eq!(zoom.token_requests(), 1);
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let zoom = ZoomMock::new().spawn().await;
    let credentials = Credentials::new(ACCOUNT_ID, CLIENT_ID, &SecretString::from("wrong".to_string()));

    let error = zoom.orchestrator("").run(&credentials, &window()).await.unwrap_err();

    assert!(matches!(
        &error,
        Error::Auth(AuthError::Rejected { status: 401, body }) if body.contains("invalid_client")
    ));
    assert!(error.is_auth());
    assert!(zoom.analytics_queries().is_empty());
}

#[tokio::test]
async fn unknown_account_is_rejected() {
    let zoom = ZoomMock::new().spawn().await;
    let credentials = Credentials::new("other-account", CLIENT_ID, &SecretString::from(CLIENT_SECRET.to_string()));

    let error = zoom.orchestrator("").run(&credentials, &window()).await.unwrap_err();

    assert!(matches!(error, Error::Auth(AuthError::Rejected { status: 400, .. })));
}

#[tokio::test]
async fn token_endpoint_failure() {
    let zoom = ZoomMock::new()
        .with_token_error(StatusCode::SERVICE_UNAVAILABLE, "maintenance")
        .spawn()
        .await;

    let error = zoom.orchestrator("").run(&credentials(), &window()).await.unwrap_err();

    insta::assert_snapshot!(error, @"Authentication failed: Token exchange rejected (503): maintenance");
}

#[tokio::test]
async fn blank_credentials_never_reach_the_provider() {
    let zoom = ZoomMock::new().spawn().await;
    let credentials = Credentials::new(ACCOUNT_ID, "   ", &SecretString::from(CLIENT_SECRET.to_string()));

    let error = zoom.orchestrator("").run(&credentials, &window()).await.unwrap_err();

    assert!(matches!(error, Error::Auth(AuthError::MissingCredential("client_id"))));
    assert_eq!(zoom.token_requests(), 0);
}

#[tokio::test]
async fn surrounding_whitespace_is_ignored() {
    let zoom = ZoomMock::new().spawn().await;
    let credentials = Credentials::new(
        &format!("  {ACCOUNT_ID}\n"),
        &format!("{CLIENT_ID} "),
        &SecretString::from(format!("\t{CLIENT_SECRET}")),
    );

    let metrics = zoom.orchestrator("").run(&credentials, &window()).await.unwrap();

    assert!(metrics.is_empty());
    assert_eq!(zoom.token_requests(), 1);
}
