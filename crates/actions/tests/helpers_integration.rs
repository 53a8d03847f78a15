//! Integration tests driving a whole bot turn through [`Helpers`].
//!
//! The invoker is scripted, so every remote action answer is fixed up front
//! and every request can be inspected afterwards.

use std::sync::Arc;

use chatwhisk_actions::{ActionParams, Helpers, LogMessage, ScriptedInvoker};
use chatwhisk_core::{ActionError, Error, InvokeResponse, Payload, default_error_handler};
use serde_json::{Value, json};

// ── Fixtures ─────────────────────────────────────────────────────────────

fn config() -> Value {
    json!({
        "openwhisk": { "package": "testpackage" },
        "logger": { "level": "INFO" },
        "conversation": { "workspaces": { "test_service": "test-workspace" } },
        "greeting": "Hello from config"
    })
}

fn inbound() -> Value {
    json!({
        "id": "turn-1",
        "input": { "channel": "test", "user": "1234", "message": "Hello you!" }
    })
}

fn with_context(mut payload: Value) -> Value {
    payload["conversationcontext"] = json!({ "user": { "_id": "u-1", "test_id": "1234" } });
    payload
}

fn helpers(responses: Vec<InvokeResponse>) -> (Helpers, Arc<ScriptedInvoker>) {
    let invoker = Arc::new(ScriptedInvoker::new(responses));
    let helpers = Helpers::from_params(
        &json!({ "config": config(), "payload": inbound() }),
        invoker.clone(),
    )
    .unwrap();
    (helpers, invoker)
}

// ── Full turn ────────────────────────────────────────────────────────────

#[tokio::test]
async fn middleware_turn_end_to_end() {
    let mut sent = with_context(inbound());
    sent["output"] = json!({ "channel": "test", "user": "1234", "intent": "#hello" });

    let (helpers, invoker) = helpers(vec![
        // core-loadcontext
        InvokeResponse::ok(with_context(inbound())),
        // middleware-wcs
        InvokeResponse::with_field(
            200,
            "payload",
            json!({
                "context": { "wcs__test_service": { "message": " Hi there! " } },
                "conversationcontext": { "wcs__test_service": { "turns": 1 } }
            }),
        ),
        // logger
        InvokeResponse::new(202, Default::default()),
        // core-output
        InvokeResponse::ok(sent),
        // core-persistcontext
        InvokeResponse::ok(json!({ "ok": true })),
    ]);

    assert!(helpers.validate_payload("INPUT").await.is_ok());
    assert!(helpers.validate_payload("MIDDLEWARE").await.is_err());

    helpers.load_context().await.unwrap();
    helpers.validate_payload("MIDDLEWARE").await.unwrap();

    let reply = helpers.wcs().call_by_name("test_service").await.unwrap();
    assert_eq!(reply, "Hi there!");

    let outcome = helpers
        .log()
        .info(LogMessage::lazy(move || format!("service said {reply}")))
        .await
        .unwrap();
    assert!(outcome.is_sent());

    let greeting = helpers.config().get("greeting", None).await.unwrap();
    helpers.send("#hello", json!({ "greeting": greeting })).await.unwrap();
    helpers.validate_payload("OUTPUT").await.unwrap();

    helpers.persist_context().await.unwrap();

    let names: Vec<String> = invoker.requests().into_iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        [
            "testpackage/core-loadcontext",
            "testpackage/middleware-wcs",
            "testpackage/logger",
            "testpackage/core-output",
            "testpackage/core-persistcontext",
        ]
    );

    let log = invoker.request(2).unwrap().params;
    assert_eq!(log["message"], "service said Hi there!");
    assert_eq!(
        log["payload"]["conversationcontext"]["wcs__test_service"]["turns"],
        1
    );

    let output = invoker.request(3).unwrap().params;
    assert_eq!(output["context"]["greeting"], "Hello from config");
    assert_eq!(output["payload"]["context"]["wcs__test_service"]["message"], "Hi there!");

    let persisted = invoker.request(4).unwrap().params;
    assert_eq!(persisted["payload"]["output"]["intent"], "#hello");
}

// ── Failure paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_output_maps_to_service_unavailable() {
    let (helpers, _) = helpers(vec![InvokeResponse::with_field(
        500,
        "error",
        json!({ "message": "channel down" }),
    )]);

    let err: Error = helpers.send("#hello", json!({})).await.unwrap_err().into();
    let response = default_error_handler(&err);
    assert_eq!(response.status_code, 503);
    assert_eq!(
        response.error.message,
        "The testpackage/core-output action did not respond with a valid result."
    );
    assert_eq!(helpers.snapshot().await, Payload::new(inbound()));
}

#[tokio::test]
async fn datastore_errors_pass_through() {
    let (helpers, _) = helpers(vec![InvokeResponse::with_field(
        409,
        "error",
        json!({ "message": "Document update conflict.", "cause": { "reason": "conflict" } }),
    )]);

    let err = helpers
        .db()
        .update(json!({ "_id": "1234", "_rev": "1-a" }))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Remote { status_code: 409, .. }));

    let response = default_error_handler(&err.into());
    assert_eq!(response.status_code, 409);
    assert_eq!(response.error.message, "Document update conflict.");
    assert_eq!(response.error.cause.unwrap()["reason"], "conflict");
}

#[tokio::test]
async fn suppressed_logs_never_reach_the_invoker() {
    let (helpers, invoker) = helpers(vec![]);
    let outcome = helpers.log().debug("noise").await.unwrap();
    assert!(!outcome.is_sent());
    assert_eq!(invoker.call_count(), 0);
}

#[tokio::test]
async fn exhausted_script_surfaces_as_transport_error() {
    let (helpers, _) = helpers(vec![]);
    let err = helpers.context().persist(&Payload::empty()).await.unwrap_err();
    assert!(matches!(err, ActionError::Transport(_)));
}

#[test]
fn params_without_payload_start_empty() {
    let params = ActionParams::from_value(&json!({ "config": config() })).unwrap();
    assert_eq!(params.payload, Payload::empty());
    assert_eq!(params.config.workspace("test_service"), Some("test-workspace"));
}
