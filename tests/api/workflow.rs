use serde_json::json;
use wiremock::matchers::any;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_workflow;

/// A provider that 500s on everything must not abort the run: every step
/// either fires once and reports its failure, or is skipped because an
/// earlier failure left its prerequisite id unset
#[tokio::test]
async fn server_errors_never_halt_the_run() {
    let mut app = spawn_workflow().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&app.server)
        .await;

    app.runner.run().await;

    let requests = app.server.received_requests().await.unwrap();

    // 15 steps, minus message lookup and the two sub-account stat steps
    // (skipped: no prerequisite), minus the pool create (its inner IP listing
    // failed), plus that extra inner IP listing = 12 requests
    assert_eq!(requests.len(), 12);

    // the skip must mean "no call issued", not "call failed"
    assert!(requests
        .iter()
        .all(|r| !r.url.path().starts_with("/account/message")));
    assert!(app.runner.message_id().is_none());
    assert!(app.runner.sub_account_id().is_none());
}

/// Create returns `{id: 1, apiKey: "abc"}`; the later domain-add call must
/// be signed with "abc"
#[tokio::test]
async fn created_sub_account_key_signs_later_domain_calls() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/account/subaccounts"))
        .and(header("X-Account-ApiKey", crate::helpers::TEST_ACCOUNT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "ESP Client - 1700000000",
            "apiKey": "abc"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/subaccount/domain"))
        .and(header("X-SubAccount-ApiKey", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "name": "yourdomain.com",
            "verified": false,
            "dkim": {"textValue": "k=rsa; p=MIGf..."}
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.create_sub_account().await;
    app.runner.add_domain().await;

    assert_eq!(app.runner.sub_account_id(), Some(1));
    assert_eq!(app.runner.domain_id(), Some(3));
}

/// When nothing was created in this run, the first listed sub-account is
/// adopted, key included
#[tokio::test]
async fn first_listed_sub_account_is_adopted() {
    let mut app = spawn_workflow().await;

    Mock::given(method("GET"))
        .and(path("/account/subaccounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "first", "apiKey": "first-key"},
            {"id": 8, "name": "second", "apiKey": "second-key"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subaccount/domains"))
        .and(header("X-SubAccount-ApiKey", "first-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.list_sub_accounts().await;
    app.runner.list_domains().await;

    assert_eq!(app.runner.sub_account_id(), Some(7));
}

/// No send happened, so the lookup step must not issue a request at all
#[tokio::test]
async fn message_lookup_is_skipped_without_a_sent_message() {
    let mut app = spawn_workflow().await;

    app.runner.get_message_details().await;

    let requests = app.server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

/// An empty IP listing means there is nothing to pool; no create request may
/// be issued
#[tokio::test]
async fn ip_pool_creation_is_skipped_when_no_ips_exist() {
    let mut app = spawn_workflow().await;

    Mock::given(method("GET"))
        .and(path("/account/ips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.create_ip_pool().await;

    let requests = app.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), "GET");
    assert!(app.runner.ip_pool_id().is_none());
}

/// The webhook create carries every event flag; the id comes back into
/// session state
#[tokio::test]
async fn webhook_creation_records_the_returned_id() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/account/webhooks"))
        .and(header("X-Account-ApiKey", crate::helpers::TEST_ACCOUNT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 21,
            "url": "https://your-webhook-endpoint.com/webhook",
            "enabled": true
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.create_webhook().await;

    assert_eq!(app.runner.webhook_id(), Some(21));
}
