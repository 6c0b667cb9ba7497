use reqwest::StatusCode;

use uuid::Uuid;

use crate::helpers::{NewSubscription, TestApp};

async fn total(app: &TestApp, query: &[(&str, &str)]) -> i64 {
    let res = app
        .subscription_sum(query)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response");
    body["total"].as_i64().expect("Response is missing a total")
}

#[tokio::test]
async fn sum_prorates_by_overlapping_months() {
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4();

    // 2025-01..2025-03 inside the period: 3 months
    app.subscription_create_ok(&NewSubscription::valid("Netflix", 300, user_id, "01-2025", Some("03-2025")))
        .await;
    // Clipped to 2025-01..2025-03: 3 months
    app.subscription_create_ok(&NewSubscription::valid("Spotify", 100, user_id, "2024-06", Some("2025-12")))
        .await;
    // Ended before the period
    app.subscription_create_ok(&NewSubscription::valid("Kinopoisk", 1000, user_id, "2024-01", Some("2024-06")))
        .await;

    let total = total(&app, &[("from", "2025-01"), ("to", "03-2025")]).await;

    assert_eq!(900 + 300, total);
}

#[tokio::test]
async fn sum_counts_open_ended_subscriptions_through_period_end() {
    let app = TestApp::spawn().await;

    app.subscription_create_ok(&NewSubscription::valid("Netflix", 50, Uuid::new_v4(), "2025-01", None))
        .await;

    let total = total(&app, &[("from", "2025-01"), ("to", "2025-06")]).await;

    assert_eq!(300, total);
}

#[tokio::test]
async fn sum_filters_by_user_and_service() {
    let app = TestApp::spawn().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    app.subscription_create_ok(&NewSubscription::valid("Netflix", 100, alice, "2025-01", None))
        .await;
    app.subscription_create_ok(&NewSubscription::valid("Spotify", 10, alice, "2025-01", None))
        .await;
    app.subscription_create_ok(&NewSubscription::valid("Netflix", 1000, bob, "2025-01", None))
        .await;

    let alice_id = alice.to_string();
    let period = [("from", "2025-01"), ("to", "2025-01")];

    let by_user = total(&app, &[period[0], period[1], ("user_id", alice_id.as_str())]).await;
    assert_eq!(110, by_user);

    let by_service = total(&app, &[period[0], period[1], ("service_name", "Netflix")]).await;
    assert_eq!(1100, by_service);

    let by_both = total(
        &app,
        &[period[0], period[1], ("user_id", alice_id.as_str()), ("service_name", "Netflix")],
    )
    .await;
    assert_eq!(100, by_both);
}

#[tokio::test]
async fn sum_accepts_quoted_user_id() {
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4();

    app.subscription_create_ok(&NewSubscription::valid("Netflix", 100, user_id, "2025-01", None))
        .await;

    let quoted = format!("\"{}\"", user_id);
    let total = total(&app, &[("from", "2025-01"), ("to", "2025-02"), ("user_id", quoted.as_str())]).await;

    assert_eq!(200, total);
}

#[tokio::test]
async fn sum_with_no_matches_is_zero() {
    let app = TestApp::spawn().await;

    let total = total(&app, &[("from", "2025-01"), ("to", "2025-12")]).await;

    assert_eq!(0, total);
}

#[tokio::test]
async fn sum_with_inverted_period_is_zero() {
    let app = TestApp::spawn().await;

    app.subscription_create_ok(&NewSubscription::valid("Netflix", 100, Uuid::new_v4(), "2024-01", None))
        .await;

    let total = total(&app, &[("from", "2025-03"), ("to", "2025-01")]).await;

    assert_eq!(0, total);
}

#[tokio::test]
async fn sum_returns_bad_request_for_invalid_query() {
    let app = TestApp::spawn().await;

    let test_cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("missing from", vec![("to", "2025-01")]),
        ("missing to", vec![("from", "2025-01")]),
        ("empty from", vec![("from", ""), ("to", "2025-01")]),
        ("malformed from", vec![("from", "2025.01"), ("to", "2025-01")]),
        ("malformed to", vec![("from", "2025-01"), ("to", "January")]),
        (
            "malformed user id",
            vec![("from", "2025-01"), ("to", "2025-02"), ("user_id", "nobody")],
        ),
    ];

    for (desc, query) in test_cases {
        let res = app
            .subscription_sum(&query)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when query was {}",
            desc
        );
    }
}
