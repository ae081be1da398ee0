#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use pantry_api::{app, AppState};

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Serve the real router in-process against the in-memory store, on an
    /// unused port, so the suite runs without PostgreSQL.
    async fn serve() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        let router = app(AppState::in_memory());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Each test gets its own server and empty store.
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::serve().await?;
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Register an account and return a bearer token for it.
pub async fn register_and_login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let client = client();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body: Value = res.json().await?;
    Ok(body["data"]["token"]
        .as_str()
        .context("token missing from login response")?
        .to_string())
}

/// POST a JSON payload to a protected endpoint and return (status, body).
pub async fn post_as(
    server: &TestServer,
    token: &str,
    path: &str,
    payload: Value,
) -> Result<(StatusCode, Value)> {
    let res = client()
        .post(format!("{}{}", server.base_url, path))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await?;
    let status = res.status();
    let body: Value = res.json().await?;
    Ok((status, body))
}

/// GET a protected endpoint and return (status, body).
pub async fn get_as(server: &TestServer, token: &str, path: &str) -> Result<(StatusCode, Value)> {
    let res = client()
        .get(format!("{}{}", server.base_url, path))
        .bearer_auth(token)
        .send()
        .await?;
    let status = res.status();
    let body: Value = res.json().await?;
    Ok((status, body))
}
