#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use serde_json::{json, Value};

use cook_taste_api::app::{router, AppState};
use cook_taste_api::auth::TokenService;
use cook_taste_api::database::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, email: &str) -> String {
        self.tokens
            .issue(json!({ "email": email }).as_object().cloned().unwrap_or_default())
            .expect("token signing")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// POST a document and return the created entity from `data.<key>`.
    pub async fn create(&self, path: &str, key: &str, body: Value) -> Result<Value> {
        let res = self.post_json(path, &body).await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "create failed: {}", res.status());
        let payload = res.json::<Value>().await?;
        Ok(payload["data"][key].clone())
    }
}

/// Serve the full router over a fresh in-memory store on an unused port.
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new(TEST_SECRET, Duration::hours(1));
    let app = router(AppState::new(store.clone(), tokens.clone()));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url,
        store,
        tokens,
        client: reqwest::Client::new(),
    })
}
