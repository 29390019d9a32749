use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use subburn_common::{Error, Result};

use super::Translator;
use crate::config::TranslationConfig;

/// Connection timeout for backend requests; the run deadline bounds the rest.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sampling temperature kept low for stable output.
const TEMPERATURE: f32 = 0.2;

fn system_prompt(target_lang: &str) -> String {
    format!(
        "You are a professional translator specialized in video subtitles. \
         Translate the following subtitles into {target_lang}. \
         Maintain the original SRT format, including timestamps and sequence numbers, exactly. \
         Only output the translated SRT content."
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiTranslator {
    client: Client,
    config: TranslationConfig,
}

impl OpenAiTranslator {
    pub fn new(config: TranslationConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self { client, config }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, srt: &str, target_lang: &str) -> Result<String> {
        let prompt = system_prompt(target_lang);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt,
                },
                ChatMessage {
                    role: "user",
                    content: srt,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::info!(model = %self.config.model, bytes = srt.len(), "Sending translation request");
        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::TranslationBackend(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TranslationBackend(format!("{status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::TranslationBackend(format!("invalid response body: {e}")))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Translation token usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(Error::EmptyTranslationResult)
    }
}
