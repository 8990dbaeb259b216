// src/tests/router_tests/health_tests.rs
use crate::router::{handle, respond};
use crate::tests::utils::{body_bytes, body_json, idle_state, json_request, request};
use serde_json::json;

#[test]
fn health_check_reports_ok() {
    let state = idle_state();

    let resp = handle(request("GET", "/api/health-check", Vec::new()), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("Content-Type").unwrap(), "application/json");
    assert_eq!(body_json(resp), json!({ "status": "ok" }));
}

#[test]
fn health_check_ignores_input_and_is_stable() {
    let state = idle_state();

    let first = respond(
        json_request("GET", "/api/health-check?verbose=1", &json!({ "junk": true })),
        &state,
    );
    let second = respond(request("GET", "/api/health-check", Vec::new()), &state);

    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);
    assert_eq!(body_bytes(first), body_bytes(second));
}
