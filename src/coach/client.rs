use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::prompts::{CHAT_SYSTEM_PROMPT, DAILY_SYSTEM_PROMPT, WEEKLY_SYSTEM_PROMPT};
use crate::config::LlmConfig;

/// The three analyses the coach can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Daily,
    Weekly,
    Chat,
}

impl PromptKind {
    pub fn system_prompt(self) -> &'static str {
        match self {
            PromptKind::Daily => DAILY_SYSTEM_PROMPT,
            PromptKind::Weekly => WEEKLY_SYSTEM_PROMPT,
            PromptKind::Chat => CHAT_SYSTEM_PROMPT,
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            PromptKind::Daily => 1000,
            PromptKind::Weekly => 900,
            PromptKind::Chat => 800,
        }
    }

    /// Returned when the model answers with no text.
    pub fn fallback_reply(self) -> &'static str {
        match self {
            PromptKind::Daily => "Sorry, the daily analysis came back empty. Please try again.",
            PromptKind::Weekly => "Sorry, the weekly analysis came back empty. Please try again.",
            PromptKind::Chat => "Sorry, I didn't get you.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Prompt-completion collaborator. Returned text is opaque to callers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, kind: PromptKind, messages: Vec<ChatMessage>) -> anyhow::Result<String>;

    /// Single-day analysis of one rendered report.
    async fn analyze_day(&self, summary: &str) -> anyhow::Result<String> {
        self.complete(PromptKind::Daily, vec![ChatMessage::user(summary)])
            .await
    }

    /// Rollup analysis of the compound weekly payload.
    async fn analyze_week(&self, weekly_summary: &str) -> anyhow::Result<String> {
        self.complete(PromptKind::Weekly, vec![ChatMessage::user(weekly_summary)])
            .await
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client, built once and injected through `AppState`.
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(cfg: &LlmConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().build().context("build http client")?,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, kind: PromptKind, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(kind.system_prompt()));
        all.extend(messages);

        let body = CompletionRequest {
            model: &self.model,
            messages: all,
            max_tokens: kind.max_tokens(),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("send completion request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("completion endpoint returned {}: {}", status, text);
        }

        let parsed: CompletionResponse = response.json().await.context("decode completion")?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| kind.fallback_reply().to_string());

        debug!(?kind, chars = reply.len(), "completion received");
        Ok(reply)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiSummarizer {
        OpenAiSummarizer::new(&LlmConfig {
            api_key: "sk-test".into(),
            base_url: format!("{}/v1/", server.uri()),
            model: "gpt-4o-mini".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn daily_analysis_sends_system_prompt_and_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Health Score (1-100): 72"}}]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).analyze_day("DAILY REPORT INPUT DATA").await.unwrap();
        assert_eq!(reply, "Health Score (1-100): 72");

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "DAILY REPORT INPUT DATA");
    }

    #[tokio::test]
    async fn empty_content_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete(PromptKind::Chat, vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply, PromptKind::Chat.fallback_reply());
    }

    #[tokio::test]
    async fn upstream_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server).analyze_week("payload").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn token_budgets_per_kind() {
        assert_eq!(PromptKind::Daily.max_tokens(), 1000);
        assert_eq!(PromptKind::Weekly.max_tokens(), 900);
        assert_eq!(PromptKind::Chat.max_tokens(), 800);
    }
}
