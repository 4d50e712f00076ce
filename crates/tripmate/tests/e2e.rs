// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the full router served over a real TCP socket with the
//! mock provider and a temp SQLite database behind it.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tripmate_gateway::{build_router, GatewayState};
use tripmate_test_utils::TestHarness;

struct Server {
    base: String,
    harness: TestHarness,
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

impl Server {
    async fn start(responses: Vec<&str>) -> Self {
        let harness = TestHarness::builder()
            .with_mock_responses(responses.into_iter().map(String::from).collect())
            .build()
            .await
            .unwrap();
        let state = GatewayState::new(
            &harness.config,
            harness.pipeline.clone(),
            harness.storage.clone(),
            harness.mock_provider.clone(),
        );
        let app = build_router(state, &harness.config.gateway.cors_origins);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
                .unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            harness,
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap();
    }
}

#[tokio::test]
async fn planning_conversation_carries_destination_into_follow_up() {
    let server = Server::start(vec![
        "Queenstown it is!\n```json\n{\"from\": \"Auckland\", \"to\": \"Queenstown\", \"duration\": \"4 days\", \"hotels\": [{\"name\": \"Lakeview Lodge\"}]}\n```",
        "Two more options near the lake.",
    ])
    .await;
    let client = reqwest::Client::new();

    let first: Value = client
        .post(server.url("/api/chat"))
        .json(&json!({"session_id": "e2e-1", "message": "Plan 4 days in Queenstown from Auckland"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["trip_data"]["to"], "Queenstown");
    assert_eq!(first["trip_data"]["hotels"][0]["name"], "Lakeview Lodge");

    let second = client
        .post(server.url("/api/chat"))
        .json(&json!({"session_id": "e2e-1", "message": "show me more hotels"}))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 200);
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["message"], "Two more options near the lake.");
    assert!(second["trip_data"].is_null());

    let request = server.harness.mock_provider.last_request().await.unwrap();
    assert!(request.system_prompt.contains("CURRENT NZ TRIP DESTINATION: Queenstown"));

    let history: Value = client
        .get(server.url("/api/chat/e2e-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 4);

    server.stop().await;
}

#[tokio::test]
async fn account_flow_over_the_wire() {
    let server = Server::start(vec![]).await;
    let client = reqwest::Client::new();

    let register = client
        .post(server.url("/api/auth/register"))
        .json(&json!({"email": "Kiri@Example.com", "password": "kia-ora-123", "name": "Kiri"}))
        .send()
        .await
        .unwrap();
    assert_eq!(register.status(), 200);
    let cookie = register
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    let session = cookie.split(';').next().unwrap().to_string();

    let saved = client
        .post(server.url("/api/user/trips"))
        .header("cookie", &session)
        .json(&json!({"trip_data": {"to": "Rotorua"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(saved.status(), 200);

    let trips: Value = client
        .get(server.url("/api/user/trips"))
        .header("cookie", &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trips.as_array().unwrap().len(), 1);
    assert_eq!(trips[0]["trip_data"]["to"], "Rotorua");

    let anonymous = client
        .get(server.url("/api/user/trips"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), 401);

    server.stop().await;
}

#[tokio::test]
async fn health_reports_adapters() {
    let server = Server::start(vec![]).await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    server.stop().await;
}
