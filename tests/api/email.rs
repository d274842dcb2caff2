use serde_json::json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_workflow;

/// The transactional send stores the first acknowledgement's message id for
/// the later lookup step
#[tokio::test]
async fn transactional_send_records_the_first_ack() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .and(header(
            "X-SubAccount-ApiKey",
            crate::helpers::TEST_SUB_ACCOUNT_KEY,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-1", "to": "recipient@example.com"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.send_transactional_email().await;

    assert_eq!(app.runner.message_id(), Some("m-1"));
}

/// The marketing send only records an id when no earlier send produced one;
/// a transactional id already in session state wins
#[tokio::test]
async fn marketing_send_does_not_overwrite_a_recorded_id() {
    let mut app = spawn_workflow().await;

    // mocks are evaluated in mount order; the first send consumes this one
    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-transactional", "to": "recipient@example.com"}
        ])))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-marketing", "to": "recipient@example.com"}
        ])))
        .mount(&app.server)
        .await;

    app.runner.send_transactional_email().await;
    app.runner.send_marketing_email().await;

    assert_eq!(app.runner.message_id(), Some("m-transactional"));
}

/// With nothing stored yet, the marketing send's first ack is adopted
#[tokio::test]
async fn marketing_send_records_an_id_when_none_is_stored() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-marketing", "to": "recipient@example.com"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.send_marketing_email().await;

    assert_eq!(app.runner.message_id(), Some("m-marketing"));
}

/// Two recipients produce two independent acknowledgements; the first one is
/// the id kept in session state
#[tokio::test]
async fn per_recipient_acks_are_handled_independently() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-1", "to": "recipient@example.com"},
            {"messageId": "m-2", "to": "second@example.com"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.send_transactional_email().await;

    assert_eq!(app.runner.message_id(), Some("m-1"));
}

/// After a successful send, the lookup step must fetch exactly that id
#[tokio::test]
async fn message_lookup_uses_the_recorded_id() {
    let mut app = spawn_workflow().await;

    Mock::given(method("POST"))
        .and(path("/subaccount/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"messageId": "m-1", "to": "recipient@example.com"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account/message/m-1"))
        .and(header("X-Account-ApiKey", crate::helpers::TEST_ACCOUNT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messageId": "m-1",
            "emailType": "transactional",
            "subject": "Order Confirmation - Transactional Email",
            "attempt": 1
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.runner.send_transactional_email().await;
    app.runner.get_message_details().await;
}
