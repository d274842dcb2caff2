use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_workflow;
use crate::helpers::TestEsp;

/// Seed session state with one known sub-account via the list step
async fn adopt_sub_account(
    app: &mut TestEsp,
    id: i64,
) {
    Mock::given(method("GET"))
        .and(path("/account/subaccounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": id, "name": "stats", "apiKey": "stats-key"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;
    app.runner.list_sub_accounts().await;
}

/// All stat queries cover the 7 days ending today, both endpoints inclusive,
/// passed as `from`/`to` in `YYYY-MM-DD` form
#[tokio::test]
async fn sub_account_stats_request_a_seven_day_window() {
    let mut app = spawn_workflow().await;
    adopt_sub_account(&mut app, 42).await;

    let to = Utc::now().date_naive();
    let from = to - Duration::days(7);

    Mock::given(method("GET"))
        .and(path("/account/subaccount/stat/42"))
        .and(query_param("from", from.to_string()))
        .and(query_param("to", to.to_string()))
        .and(header("X-Account-ApiKey", crate::helpers::TEST_ACCOUNT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": to.to_string(), "stats": {"processed": 5, "delivered": 4, "hardBounced": 1}}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.get_sub_account_stats().await;
}

#[tokio::test]
async fn aggregate_stats_hit_the_aggregate_path() {
    let mut app = spawn_workflow().await;
    adopt_sub_account(&mut app, 42).await;

    let to = Utc::now().date_naive();
    let from = to - Duration::days(7);

    Mock::given(method("GET"))
        .and(path("/account/subaccount/stat/42/aggregate"))
        .and(query_param("from", from.to_string()))
        .and(query_param("to", to.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processed": 12, "delivered": 11, "dropped": 1
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.get_aggregate_stats().await;
}

/// Stats need a sub-account; without one the step issues no request
#[tokio::test]
async fn stats_are_skipped_without_a_sub_account() {
    let mut app = spawn_workflow().await;

    app.runner.get_sub_account_stats().await;
    app.runner.get_aggregate_stats().await;

    let requests = app.server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

/// Account-level stats need no sub-account and are signed with the parent key
#[tokio::test]
async fn account_stats_request_a_seven_day_window() {
    let mut app = spawn_workflow().await;

    let to = Utc::now().date_naive();
    let from = to - Duration::days(7);

    Mock::given(method("GET"))
        .and(path("/account/stats"))
        .and(query_param("from", from.to_string()))
        .and(query_param("to", to.to_string()))
        .and(header("X-Account-ApiKey", crate::helpers::TEST_ACCOUNT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": from.to_string(), "stats": {"processed": 100, "delivered": 97, "opened": 40}}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.get_account_stats().await;
}
