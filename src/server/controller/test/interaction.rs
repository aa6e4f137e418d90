use super::*;
use reqwest::StatusCode;
use test_utils::factory::message::MessageFactory;

/// Tests the PING handshake over HTTP.
///
/// Expected: 200 OK with `{"type": 1}`
#[tokio::test]
async fn answers_ping() {
    let app = TestApp::empty().await;

    let response = app
        .post_interaction(json!({ "type": 1, "application_id": "77", "token": "t" }).to_string())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "type": 1 }));
}

/// Tests a malformed body.
///
/// Expected: 400 Bad Request with an error body and no Discord calls
#[tokio::test]
async fn rejects_invalid_json() {
    let app = TestApp::empty().await;

    let response = app.post_interaction("{not json".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Invalid JSON" })
    );
    assert!(app.discord.requests().is_empty());
}

/// Tests that invalid `/clear` input is answered in-band.
///
/// Expected: 200 OK with an ephemeral type 4 reply and no Discord calls
#[tokio::test]
async fn answers_invalid_amount_immediately() {
    let app = TestApp::empty().await;

    let response = app.post_interaction(clear_payload("abc").to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "type": 4,
            "data": {
                "content": "Please provide a valid number greater than 0, or type \"all\".",
                "flags": 64
            }
        })
    );
    assert!(app.discord.requests().is_empty());
}

/// Tests a full `/clear all` round trip through the HTTP endpoint.
///
/// Verifies the webhook answers with a deferred acknowledgement before the work is done,
/// then the background run empties the channel despite an initial rate limit.
///
/// Expected: deferred response, channel emptied, final "All done" edit
#[tokio::test]
async fn clears_channel_in_background() {
    let discord = TestBuilder::new()
        .with_messages(MessageFactory::new().recent(120).old(3).build())
        .with_rate_limits(1, 0.01)
        .build()
        .await
        .unwrap();
    let app = TestApp::spawn(discord).await;

    let response = app.post_interaction(clear_payload("all").to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "type": 5, "data": { "flags": 64 } })
    );

    app.finish_runs().await;

    assert!(app.discord.remaining_message_ids().is_empty());
    assert_eq!(app.discord.single_deletes().len(), 3);
    assert_eq!(
        app.discord.edits().last().map(String::as_str),
        Some("✅ All done! Successfully deleted a total of **123** messages.")
    );
}

/// Tests that a permission error stops the run and is reported to the user.
///
/// Expected: error edit mentioning the partial count, messages left in place
#[tokio::test]
async fn reports_missing_permissions() {
    let discord = TestBuilder::new()
        .with_messages(MessageFactory::new().recent(5).build())
        .with_failure(
            reqwest::Method::POST,
            "/bulk-delete",
            StatusCode::FORBIDDEN,
            json!({ "message": "Missing Permissions", "code": 50013 }),
        )
        .build()
        .await
        .unwrap();
    let app = TestApp::spawn(discord).await;

    app.post_interaction(clear_payload("5").to_string()).await;
    app.finish_runs().await;

    let last = app.discord.edits().pop().unwrap();
    assert!(last.starts_with("❌ An error occurred while deleting messages."));
    assert!(last.contains("Deleted **0** before stopping."));
    assert!(last.contains("Missing Permissions"));
    assert_eq!(app.discord.remaining_message_ids().len(), 5);
}
