// ABOUTME: HTTP-level tests for the REST API through the full middleware stack
// ABOUTME: Verifies the error envelope, status mapping, request ids, and end-to-end flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_recipe, create_test_router, send_json, send_with_headers};
use http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_and_ready() {
    let (router, _) = create_test_router();

    let response = send_json(&router, Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");

    let response = send_json(&router, Method::GET, "/ready", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (router, _) = create_test_router();

    let response = send_with_headers(
        &router,
        Method::GET,
        "/health",
        None,
        &[("x-request-id", "trace-me-42")],
    )
    .await;
    assert_eq!(response.headers.get("x-request-id").unwrap(), "trace-me-42");

    let response = send_json(&router, Method::GET, "/health", None).await;
    let generated = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(generated.starts_with("req_"));
}

#[tokio::test]
async fn test_not_found_uses_error_envelope() {
    let (router, _) = create_test_router();
    let uri = format!("/api/cooking/sessions/{}", Uuid::new_v4());

    let response =
        send_with_headers(&router, Method::GET, &uri, None, &[("x-request-id", "req-404")]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(response.body["error"]["type"], "not_found");
    assert_eq!(response.body["error"]["requestId"], "req-404");
    assert!(response.body["error"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let (router, _) = create_test_router();
    let response = send_json(&router, Method::GET, "/api/nothing-here", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (router, _) = create_test_router();

    let response = send_json(
        &router,
        Method::POST,
        "/api/cooking/sessions",
        Some(json!({ "recipeId": "not-a-uuid" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "INVALID_INPUT");

    let response = send_json(&router, Method::POST, "/api/cooking/sessions", Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(response.body["error"]["details"]["field"], "recipeId");
}

#[tokio::test]
async fn test_recipe_lifecycle_over_http() {
    let (router, _) = create_test_router();

    let response = send_json(
        &router,
        Method::POST,
        "/api/recipes",
        Some(json!({
            "name": "Omelette",
            "servings": 1,
            "instructions": [
                { "step": "whisk eggs", "timing": 2 },
                { "step": "cook", "timing": 4 }
            ]
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let recipe_id = response.body["id"].as_str().unwrap().to_owned();

    let response = send_json(&router, Method::GET, &format!("/api/recipes/{recipe_id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Omelette");
    assert_eq!(response.body["instructions"].as_array().unwrap().len(), 2);

    let response = send_json(&router, Method::GET, "/api/recipes", None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let response = send_json(
        &router,
        Method::POST,
        "/api/recipes",
        Some(json!({ "name": "Empty", "instructions": [] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send_json(
        &router,
        Method::POST,
        "/api/recipes",
        Some(json!({ "name": "Forever", "instructions": [{ "step": "wait", "timing": 1e300 }] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALUE_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_cooking_session_flow_over_http() {
    let (router, resources) = create_test_router();
    let recipe_id = create_recipe(&resources, 2);

    let response = send_json(
        &router,
        Method::POST,
        "/api/cooking/sessions",
        Some(json!({ "recipeId": recipe_id, "automationLevel": "assisted" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "in_progress");
    assert_eq!(response.body["currentStep"], 0);
    let session_id = response.body["sessionId"].as_str().unwrap().to_owned();
    let base = format!("/api/cooking/sessions/{session_id}");

    let response = send_json(
        &router,
        Method::POST,
        &format!("{base}/sensors"),
        Some(json!({ "sensorType": "temperature", "value": 175.5 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["sensor"], "temperature");

    let response = send_json(
        &router,
        Method::POST,
        &format!("{base}/metrics"),
        Some(json!({ "name": "doneness", "value": 0.4 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = send_json(&router, Method::POST, &format!("{base}/pause"), None).await;
    assert_eq!(response.body["status"], "paused");

    // Advancing while paused is a conflict
    let response = send_json(&router, Method::POST, &format!("{base}/advance"), None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"]["code"], "INVALID_TRANSITION");
    assert_eq!(response.body["error"]["details"]["currentState"], "paused");

    let response = send_json(&router, Method::POST, &format!("{base}/resume"), None).await;
    assert_eq!(response.body["status"], "in_progress");

    let response = send_json(&router, Method::POST, &format!("{base}/advance"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["outcome"], "step");
    assert_eq!(response.body["stepIndex"], 1);

    let response = send_json(&router, Method::GET, &format!("{base}/progress"), None).await;
    assert_eq!(response.body["currentStep"], 1);
    assert_eq!(response.body["totalSteps"], 2);

    let response = send_json(&router, Method::POST, &format!("{base}/advance"), None).await;
    assert_eq!(response.body["outcome"], "completed");
    assert_eq!(response.body["stepTimings"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["sensorReadings"], 1);

    let response = send_json(
        &router,
        Method::POST,
        &format!("{base}/abort"),
        Some(json!({ "reason": "too late" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_abort_without_body() {
    let (router, resources) = create_test_router();
    let recipe_id = create_recipe(&resources, 3);
    let session = resources
        .cooking
        .start_session(recipe_id, autofood_server::cooking::SessionOptions::default())
        .await
        .unwrap();

    let uri = format!("/api/cooking/sessions/{}/abort", session.id());
    let response = send_json(&router, Method::POST, &uri, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "aborted");
}

#[tokio::test]
async fn test_consumption_flow_over_http() {
    let (router, _) = create_test_router();

    let mut last = serde_json::Value::Null;
    for _ in 0..5 {
        let response = send_json(
            &router,
            Method::POST,
            "/api/consumption/records",
            Some(json!({
                "userId": "erin",
                "ingredient": "lettuce",
                "portionServed": 100,
                "portionConsumed": 70
            })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
        last = response.body;
    }
    assert_eq!(last["suggestion"]["suggestedPortion"], 80.0);

    let base = "/api/consumption/profiles/erin/ingredients/lettuce";
    let response = send_json(&router, Method::GET, &format!("{base}/suggestion"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["suggestedPortion"], 80.0);

    let response = send_json(
        &router,
        Method::POST,
        &format!("{base}/adjustment"),
        Some(json!({ "newPortion": 80 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"]["code"], "CONSULTATION_REQUIRED");

    let response = send_json(
        &router,
        Method::POST,
        &format!("{base}/adjustment"),
        Some(json!({ "newPortion": 80, "userApproved": true })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["newPortion"], 80.0);

    // Suggestion is consumed by the adjustment
    let response = send_json(&router, Method::GET, &format!("{base}/suggestion"), None).await;
    assert!(response.body.is_null());

    let response =
        send_json(&router, Method::GET, &format!("{base}/forecast?daysAhead=7"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["daysAhead"], 7);

    let response =
        send_json(&router, Method::GET, &format!("{base}/forecast?daysAhead=abc"), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send_json(&router, Method::GET, "/api/consumption/profiles/erin", None).await;
    assert_eq!(response.body["recordCount"], 5);
    assert_eq!(response.body["ingredients"][0]["currentPortion"], 80.0);

    let response = send_json(&router, Method::GET, "/api/consumption/profiles/nobody", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_update_over_http() {
    let (router, _) = create_test_router();

    let response = send_json(
        &router,
        Method::PUT,
        "/api/consumption/profiles/frank",
        Some(json!({ "wasteThresholdPct": 25.0 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["settings"]["wasteThresholdPct"], 25.0);

    let response = send_json(
        &router,
        Method::PUT,
        "/api/consumption/profiles/frank",
        Some(json!({ "maxAdjustmentPct": -3.0 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hardware_stubs_over_http() {
    let (router, _) = create_test_router();

    let response = send_json(&router, Method::GET, "/api/hardware/sensors", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = send_json(
        &router,
        Method::POST,
        "/api/hardware/actuators/oven",
        Some(json!({ "command": "preheat", "parameters": { "celsius": 200 } })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(response.body["error"]["code"], "NOT_IMPLEMENTED");

    let response = send_json(
        &router,
        Method::POST,
        "/api/hardware/actuators/toaster",
        Some(json!({ "command": "toast" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
