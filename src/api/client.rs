// ABOUTME: Backend HTTP client — bearer-token-authenticated JSON over reqwest.
// ABOUTME: No retries or backoff: every failure is terminal for that one request.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::api::types::{
    ErrorBody, ExecuteRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use crate::session::store::{ChatMessage, DebugProblem};

/// The backend surface the app talks to. Seamed as a trait so screens can be
/// driven against a stub in tests.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Replace the bearer token attached to subsequent requests.
    fn set_token(&self, token: Option<String>);

    async fn login(&self, username: &str, password: &str) -> anyhow::Result<LoginResponse>;
    async fn register(&self, username: &str, email: &str, password: &str)
    -> anyhow::Result<String>;
    /// Submit source to the judge proxy; returns the captured output text.
    async fn execute(&self, source_code: &str, language_id: u32, stdin: &str)
    -> anyhow::Result<String>;
    /// Send the whole transcript; returns the assistant's reply text.
    async fn chat(&self, transcript: &[ChatMessage]) -> anyhow::Result<String>;
    async fn debug_problems(&self) -> anyhow::Result<Vec<DebugProblem>>;
}

/// reqwest-backed implementation of [`Backend`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.http.post(self.endpoint(path));
        self.authorize(req)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.http.get(self.endpoint(path));
        self.authorize(req)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        // A poisoned lock only means another thread panicked mid-write; the
        // token value itself is still usable.
        let token = self
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Extract the plain-text body, or fail with the backend's status and message.
async fn text_or_error(resp: reqwest::Response) -> anyhow::Result<String> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        anyhow::bail!("{} - {}", status.as_u16(), backend_message(&body))
    }
}

/// Pull a human-readable message out of an error body, JSON or not.
fn backend_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) if !err.message.is_empty() => err.message,
        _ if !body.is_empty() => body.to_string(),
        _ => "request failed".to_string(),
    }
}

#[async_trait]
impl Backend for ApiClient {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    async fn login(&self, username: &str, password: &str) -> anyhow::Result<LoginResponse> {
        let resp = self
            .post("/auth/login")
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let body = text_or_error(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<String> {
        let resp = self
            .post("/auth/register")
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        let body = text_or_error(resp).await?;
        let parsed: RegisterResponse = serde_json::from_str(&body)?;
        if parsed.message.is_empty() {
            Ok("Registration successful! Please login.".to_string())
        } else {
            Ok(parsed.message)
        }
    }

    async fn execute(
        &self,
        source_code: &str,
        language_id: u32,
        stdin: &str,
    ) -> anyhow::Result<String> {
        let resp = self
            .post("/judge0/execute")
            .json(&ExecuteRequest {
                source_code,
                language_id,
                stdin,
            })
            .send()
            .await?;
        text_or_error(resp).await
    }

    async fn chat(&self, transcript: &[ChatMessage]) -> anyhow::Result<String> {
        let resp = self
            .post("/gemini/chat")
            .json(&transcript)
            .send()
            .await?;
        text_or_error(resp).await
    }

    async fn debug_problems(&self) -> anyhow::Result<Vec<DebugProblem>> {
        let resp = self.get("/debug-problems").send().await?;
        let body = text_or_error(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
