//! Admin API: runtime peer addition.

use std::sync::Arc;

use rr_balancer::admin::{self, AdminState};
use rr_balancer::lifecycle::startup;
use rr_balancer::mock_backend;
use serde_json::{json, Value};

mod common;

const KEY: &str = "test-key";

async fn start_admin(lb: &common::TestBalancer) -> String {
    let listener = startup::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AdminState {
        pool: lb.pool.clone(),
        lifecycle: lb.state.clone(),
        api_key: Arc::from(KEY),
    };
    tokio::spawn(admin::serve(listener, state, lb.shutdown.subscribe()));
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_add_peer_joins_rotation() {
    let first = common::start_echo_backend().await;
    let added = common::start_echo_backend().await;
    let lb = common::start_balancer(vec![common::url(first)], |_| {}).await;
    let admin_url = start_admin(&lb).await;
    let client = common::client();

    let res = client
        .post(format!("{}/admin/peers", admin_url))
        .bearer_auth(KEY)
        .json(&json!({ "url": common::url(added) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let peers: Value = res.json().await.unwrap();
    assert_eq!(peers.as_array().unwrap().len(), 2);
    assert_eq!(peers[1]["host"], added.to_string());

    let mut ports = Vec::new();
    for _ in 0..4 {
        let body = client.get(lb.url("/")).send().await.unwrap().text().await.unwrap();
        ports.push(body);
    }
    let expected = mock_backend::greeting(&added.port().to_string());
    let hits = ports.iter().filter(|b| **b == expected).count();
    assert_eq!(hits, 2);

    lb.shutdown.trigger();
}

#[tokio::test]
async fn test_add_peer_rejects_malformed_url() {
    let backend = common::start_echo_backend().await;
    let lb = common::start_balancer(vec![common::url(backend)], |_| {}).await;
    let admin_url = start_admin(&lb).await;

    let res = common::client()
        .post(format!("{}/admin/peers", admin_url))
        .bearer_auth(KEY)
        .json(&json!({ "url": "not a url" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(lb.pool.len(), 1);

    lb.shutdown.trigger();
}

#[tokio::test]
async fn test_requires_token() {
    let backend = common::start_echo_backend().await;
    let lb = common::start_balancer(vec![common::url(backend)], |_| {}).await;
    let admin_url = start_admin(&lb).await;
    let client = common::client();

    let res = client.get(format!("{}/admin/status", admin_url)).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("{}/admin/status", admin_url))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let status: Value = client
        .get(format!("{}/admin/status", admin_url))
        .bearer_auth(KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "serving");
    assert_eq!(status["pool_size"], 1);

    lb.shutdown.trigger();
}
