use std::time::Duration;

use analytics::{Error, FetchWindow};
use axum::http::StatusCode;
use integration_tests::*;
use jiff::civil::date;
use serde_json::json;

fn queue(id: u32, seconds: u32) -> serde_json::Value {
    json!({ "queue_id": id.to_string(), "queue_name": format!("Queue {id}"), "avg_handle_time": seconds })
}

#[tokio::test]
async fn pages_are_concatenated_in_order() {
    let zoom = ZoomMock::new()
        .with_pages(vec![
            vec![queue(1, 60), queue(2, 120)],
            vec![queue(3, 180)],
            vec![queue(4, 240), queue(5, 300)],
        ])
        .spawn()
        .await;

    let report = zoom.orchestrator("").query(&credentials(), &window()).await.unwrap();

    let ids: Vec<_> = report.metrics.iter().filter_map(|m| m.queue_id.as_deref()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);

    let cursors: Vec<_> = zoom
        .analytics_queries()
        .iter()
        .map(|query| query.get("next_page_token").cloned())
        .collect();

    insta::assert_debug_snapshot!(cursors, @r#"
    [
        None,
        Some(
            "page-1",
        ),
        Some(
            "page-2",
        ),
    ]
    "#);
}

#[tokio::test]
async fn window_is_sent_with_every_page() {
    let zoom = ZoomMock::new()
        .with_pages(vec![vec![queue(1, 60)], vec![queue(2, 60)]])
        .spawn()
        .await;

    let window = FetchWindow::new(date(2024, 9, 1), date(2024, 9, 7), 500);
    zoom.orchestrator("").run(&credentials(), &window).await.unwrap();

    for query in zoom.analytics_queries() {
        assert_eq!(query.get("from").map(String::as_str), Some("2024-09-01"));
        assert_eq!(query.get("to").map(String::as_str), Some("2024-09-07"));
        assert_eq!(query.get("page_size").map(String::as_str), Some("300"));
    }
}

#[tokio::test]
async fn alternative_list_key() {
    let zoom = ZoomMock::new()
        .with_list_key("queues")
        .with_pages(vec![vec![queue(1, 60)], vec![queue(2, 90)]])
        .spawn()
        .await;

    let report = zoom.orchestrator("").query(&credentials(), &window()).await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.metrics[1].avg_handle_time_seconds, 90.0);
}

#[tokio::test]
async fn failing_page_discards_earlier_pages() {
    let zoom = ZoomMock::new()
        .with_pages(vec![vec![queue(1, 60)], vec![queue(2, 60)], vec![queue(3, 60)]])
        .with_analytics_error(1, StatusCode::TOO_MANY_REQUESTS, r#"{"code":429,"message":"Too many requests"}"#)
        .spawn()
        .await;

    let error = zoom.orchestrator("").run(&credentials(), &window()).await.unwrap_err();

    insta::assert_snapshot!(error, @r#"Zoom API error (429): {"code":429,"message":"Too many requests"}"#);
    assert_eq!(error.status(), Some(429));
    assert_eq!(zoom.analytics_queries().len(), 2);
}

#[tokio::test]
async fn slow_page_times_out() {
    let zoom = ZoomMock::new()
        .with_analytics_delay(Duration::from_secs(5))
        .spawn()
        .await;

    let error = zoom
        .orchestrator(r#"page_timeout = "100ms""#)
        .run(&credentials(), &window())
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Timeout { .. }));
}

#[tokio::test]
async fn endless_cursor_hits_the_page_cap() {
    let zoom = ZoomMock::new()
        .with_pages(vec![vec![queue(1, 60)]])
        .with_endless_cursor()
        .spawn()
        .await;

    let error = zoom
        .orchestrator("max_pages = 3")
        .run(&credentials(), &window())
        .await
        .unwrap_err();

    assert!(matches!(error, Error::PageLimitExceeded { max_pages: 3 }));
    assert_eq!(zoom.analytics_queries().len(), 3);
}

#[tokio::test]
async fn empty_last_page_cursor_ends_pagination() {
    let zoom = ZoomMock::new().with_pages(vec![vec![], vec![]]).spawn().await;

    let report = zoom.orchestrator("").query(&credentials(), &window()).await.unwrap();

    assert!(report.records.is_empty());
    assert!(report.sample().is_none());
    assert_eq!(zoom.analytics_queries().len(), 2);
}
