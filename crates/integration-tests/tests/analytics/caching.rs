use analytics::FetchWindow;
use integration_tests::*;
use jiff::civil::date;
use serde_json::json;

#[tokio::test]
async fn token_is_reused_across_windows() {
    let zoom = ZoomMock::new()
        .with_pages(vec![vec![json!({ "queue_name": "Sales", "avg_handle_time": 60 })]])
        .spawn()
        .await;

    let orchestrator = zoom.orchestrator("");
    let other = FetchWindow::new(date(2024, 8, 1), date(2024, 8, 31), 100);

    orchestrator.run(&credentials(), &window()).await.unwrap();
    orchestrator.run(&credentials(), &other).await.unwrap();

    assert_eq!(zoom.token_requests(), 1);
    assert_eq!(zoom.analytics_queries().len(), 2);
}

#[tokio::test]
async fn same_window_is_served_from_cache() {
    let zoom = ZoomMock::new()
        .with_pages(vec![
            vec![json!({ "queue_name": "Sales", "avg_handle_time": 60 })],
            vec![json!({ "queue_name": "Support", "avg_handle_time": 90 })],
        ])
        .spawn()
        .await;

    let orchestrator = zoom.orchestrator("");

    let first = orchestrator.run(&credentials(), &window()).await.unwrap();
    let second = orchestrator.run(&credentials(), &window()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(zoom.analytics_queries().len(), 2);
}

#[tokio::test]
async fn invalidated_token_is_exchanged_again() {
    let zoom = ZoomMock::new().spawn().await;
    let orchestrator = zoom.orchestrator("");

    orchestrator.run(&credentials(), &window()).await.unwrap();
    orchestrator.tokens().invalidate(&credentials());
    orchestrator.run(&credentials(), &window()).await.unwrap();

    assert_eq!(zoom.token_requests(), 2);
    assert_eq!(zoom.analytics_queries().len(), 2);
}
