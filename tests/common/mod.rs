#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use courses_api::config::AppConfig;
use courses_api::database::{MemoryStore, Store};
use courses_api::AppState;

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Serve the full application on a free port, backed by a fresh
    /// in-memory store.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with(store: Arc<dyn Store>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let app = courses_api::app(AppState::new(store), &AppConfig::from_env());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Register a user through the API and assert it succeeded.
    pub async fn create_user(&self, first_name: &str, email: &str, password: &str) -> Result<()> {
        let res = self
            .post("/api/users")
            .json(&json!({
                "firstName": first_name,
                "lastName": "Tester",
                "emailAddress": email,
                "password": password,
            }))
            .send()
            .await?;
        anyhow::ensure!(
            res.status() == StatusCode::CREATED,
            "user creation failed: {}",
            res.status()
        );
        Ok(())
    }

    /// Create a course as the given user and return its id from the
    /// `Location` header.
    pub async fn create_course(&self, email: &str, password: &str, title: &str) -> Result<i64> {
        let res = self
            .post("/api/courses")
            .basic_auth(email, Some(password))
            .json(&json!({
                "title": title,
                "description": "A course used in tests.",
                "estimatedTime": "2 hours",
            }))
            .send()
            .await?;
        anyhow::ensure!(
            res.status() == StatusCode::CREATED,
            "course creation failed: {}",
            res.status()
        );
        let location = res
            .headers()
            .get("location")
            .context("missing Location header")?
            .to_str()?;
        location
            .strip_prefix("/courses/")
            .context("unexpected Location")?
            .parse()
            .context("non-numeric course id")
    }

    pub async fn user_count(&self, email: &str, password: &str) -> Result<usize> {
        let users: Value = self
            .get("/api/users")
            .basic_auth(email, Some(password))
            .send()
            .await?
            .json()
            .await?;
        users
            .as_array()
            .map(Vec::len)
            .context("users response is not an array")
    }
}

pub fn access_denied() -> Value {
    json!({ "message": "Access Denied" })
}
