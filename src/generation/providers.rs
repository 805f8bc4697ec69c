//! HTTP adapters for the hosted text-completion backends.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ProviderKeys;
use crate::errors::AppError;
use super::types::ProviderKind;

const GROQ_MODEL: &str = "llama-3.1-8b-instant";
const HUGGINGFACE_MODEL: &str = "microsoft/DialoGPT-large";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling settings for one completion request.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub enum Provider {
    Groq { api_key: String, base_url: String },
    Anthropic { api_key: String, base_url: String, model: String },
    HuggingFace { api_key: String, base_url: String },
}

impl Provider {
    /// Configured providers in priority order.
    pub fn from_keys(keys: &ProviderKeys) -> Vec<Provider> {
        let mut providers = Vec::new();
        if let Some(api_key) = &keys.groq {
            providers.push(Provider::Groq {
                api_key: api_key.clone(),
                base_url: keys.groq_base_url.trim_end_matches('/').to_string(),
            });
        }
        if let Some(api_key) = &keys.anthropic {
            providers.push(Provider::Anthropic {
                api_key: api_key.clone(),
                base_url: keys.anthropic_base_url.trim_end_matches('/').to_string(),
                model: keys.anthropic_model.clone(),
            });
        }
        if let Some(api_key) = &keys.huggingface {
            providers.push(Provider::HuggingFace {
                api_key: api_key.clone(),
                base_url: keys.huggingface_base_url.trim_end_matches('/').to_string(),
            });
        }
        providers
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Groq { .. } => ProviderKind::Groq,
            Provider::Anthropic { .. } => ProviderKind::Anthropic,
            Provider::HuggingFace { .. } => ProviderKind::HuggingFace,
        }
    }

    /// Whether the backend follows instructions well enough to return JSON.
    pub fn supports_structured_output(&self) -> bool {
        !matches!(self, Provider::HuggingFace { .. })
    }

    /// Send a system + user prompt and return the raw completion text.
    pub async fn complete(
        &self,
        client: &Client,
        system: &str,
        user: &str,
        sampling: Sampling,
    ) -> Result<String, AppError> {
        match self {
            Provider::Groq { api_key, base_url } => {
                let body = ChatRequest {
                    model: GROQ_MODEL,
                    messages: vec![
                        ChatMessage { role: "system", content: system },
                        ChatMessage { role: "user", content: user },
                    ],
                    temperature: sampling.temperature,
                    max_tokens: sampling.max_tokens,
                };
                let response = client
                    .post(format!("{base_url}/chat/completions"))
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .await?;
                let parsed: ChatResponse = decode(self.kind(), response).await?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| AppError::Upstream("groq returned no content".to_string()))
            }
            Provider::Anthropic { api_key, base_url, model } => {
                let body = json!({
                    "model": model,
                    "system": system,
                    "messages": [{ "role": "user", "content": user }],
                    "temperature": sampling.temperature,
                    "max_tokens": sampling.max_tokens,
                });
                let response = client
                    .post(format!("{base_url}/v1/messages"))
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .await?;
                let parsed: MessagesResponse = decode(self.kind(), response).await?;
                let text: String = parsed
                    .content
                    .into_iter()
                    .filter(|block| block.kind == "text")
                    .map(|block| block.text)
                    .collect();
                if text.trim().is_empty() {
                    return Err(AppError::Upstream("anthropic returned no content".to_string()));
                }
                Ok(text)
            }
            Provider::HuggingFace { api_key, base_url } => {
                let body = json!({
                    "inputs": format!("{system}\n\n{user}"),
                    "parameters": {
                        "max_length": sampling.max_tokens.min(500),
                        "temperature": sampling.temperature,
                        "do_sample": true,
                    },
                });
                let response = client
                    .post(format!("{base_url}/models/{HUGGINGFACE_MODEL}"))
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .await?;
                let parsed: Vec<GeneratedText> = decode(self.kind(), response).await?;
                parsed
                    .into_iter()
                    .next()
                    .map(|g| g.generated_text)
                    .ok_or_else(|| AppError::Upstream("huggingface returned no content".to_string()))
            }
        }
    }
}

async fn decode<T: for<'de> Deserialize<'de>>(kind: ProviderKind, response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        return Err(map_status_error(kind, status));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Upstream(format!("{} returned an unreadable body: {e}", kind.as_str())))
}

fn map_status_error(kind: ProviderKind, status: StatusCode) -> AppError {
    let reason = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "credentials rejected",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        s if s.is_server_error() => "service unavailable",
        _ => "request rejected",
    };
    AppError::Upstream(format!("{} API error {}: {reason}", kind.as_str(), status.as_u16()))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> ProviderKeys {
        ProviderKeys {
            groq_base_url: "https://groq.example/v1/".into(),
            anthropic_base_url: "https://anthropic.example".into(),
            anthropic_model: "model".into(),
            huggingface_base_url: "https://hf.example".into(),
            ..Default::default()
        }
    }

    #[test]
    fn priority_follows_groq_anthropic_huggingface() {
        let mut k = keys();
        k.huggingface = Some("hf".into());
        k.groq = Some("gq".into());
        let kinds: Vec<_> = Provider::from_keys(&k).iter().map(Provider::kind).collect();
        assert_eq!(kinds, vec![ProviderKind::Groq, ProviderKind::HuggingFace]);

        k.anthropic = Some("an".into());
        let kinds: Vec<_> = Provider::from_keys(&k).iter().map(Provider::kind).collect();
        assert_eq!(
            kinds,
            vec![ProviderKind::Groq, ProviderKind::Anthropic, ProviderKind::HuggingFace]
        );
    }

    #[test]
    fn no_keys_means_no_providers() {
        assert!(Provider::from_keys(&keys()).is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let mut k = keys();
        k.groq = Some("gq".into());
        match &Provider::from_keys(&k)[0] {
            Provider::Groq { base_url, .. } => assert_eq!(base_url, "https://groq.example/v1"),
            other => panic!("unexpected provider {other:?}"),
        }
    }

    #[test]
    fn status_errors_name_the_provider() {
        let err = map_status_error(ProviderKind::Groq, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "Upstream error: groq API error 429: rate limited");
    }

    #[test]
    fn chat_response_tolerates_missing_content() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#)
            .expect("parse");
        assert_eq!(parsed.choices[0].message.content, "");
    }
}
