//! Brochure generation through an OpenAI-compatible chat-completion endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default endpoint root; `/chat/completions` is appended
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Instruction given to the model on every run
const SYSTEM_PROMPT: &str = "Jesteś ekspertem w dziedzinie analizy inwestycyjnej i tworzenia
perswazyjnych materiałów sprzedażowych. Twoim zadaniem jest przeanalizowanie
treści strony internetowej i wygenerowanie profesjonalnej broszury
inwestycyjnej w języku polskim.

BROSZURA MUSI ZAWIERAĆ NASTĘPUJĄCE SEKCJE:

1. **Tytuł Broszury** - Atrakcyjny, perswazyjny tytuł zachęcający do inwestycji
2. **Podsumowanie Inwestycyjne** - Krótkie (3-4 zdania) perswazyjne uzasadnienie,
   dlaczego warto zainwestować
3. **Propozycje Wartości** - Wypunktowane kluczowe korzyści i przewagi
   konkurencyjne
4. **Kluczowe Dane** - 3-5 najważniejszych danych/faktów ze strony
   (osiągnięcia, wielkość rynku, statystyki)
5. **Kategorie/Obszary** - Podział treści na logiczne kategorie
   biznesowe/technologiczne
6. **Kluczowe Ryzyka** - 2-3 potencjalne ryzyka wynikające z analizy treści

WYMAGANIA:
- Ton: Sprzedażowy i perswazyjny, ukierunkowany na zachęcanie do inwestycji
- Język: Profesjonalny polski
- Format: Czysty Markdown z nagłówkami ##
- Długość: Zwięzłe, ale kompletne sekcje
- Skupienie: Na kluczowych danych inwestycyjnych i korzyściach biznesowych

Przeanalizuj podaną treść i wygeneruj broszurę zgodnie z powyższymi
wytycznymi.";

/// Lead-in placed before the corpus in the user message
const USER_PROMPT_PREFIX: &str =
    "Przeanalizuj następującą treść strony internetowej i wygeneruj broszurę inwestycyjną:";

/// The closed set of ways a generation request can fail
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("nothing to send: the page content or the API key is empty")]
    MissingInput,
    #[error("invalid API key")]
    Authentication,
    #[error("API rate limit exceeded")]
    RateLimit,
    #[error("timed out waiting for the API")]
    Timeout,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("the API returned no brochure text")]
    EmptyResponse,
    #[error("unexpected error while generating the brochure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a chat-completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Transport for chat-completion requests
#[async_trait]
pub trait CompletionClient {
    /// Send one request and return the text of the first choice
    async fn complete(&self, api_key: &str, request: &ChatRequest)
    -> Result<String, GenerationError>;
}

/// `CompletionClient` speaking the OpenAI chat-completions protocol
pub struct OpenAiClient {
    client: Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, GenerationError> {
        ::log::debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint(),
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => GenerationError::Authentication,
                StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimit,
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    let message = serde_json::from_str::<ErrorEnvelope>(&body)
                        .map(|envelope| envelope.error.message)
                        .unwrap_or(body);
                    GenerationError::Api { status, message }
                }
            });
        }

        let body: ChatResponse = response.json().await.map_err(transport_error)?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

fn transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Unexpected(error.to_string())
    }
}

/// Model parameters for brochure requests
#[derive(Debug, Clone)]
pub struct BrochureGenerator {
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Default for BrochureGenerator {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl BrochureGenerator {
    pub fn new(model: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            temperature,
        }
    }

    /// Build the request sent for `corpus`
    pub fn request(&self, corpus: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(&format!("{}\n\n{}", USER_PROMPT_PREFIX, corpus)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Generate the brochure markdown for `corpus`.
    ///
    /// Returns `MissingInput` without touching the network when either input
    /// is empty. Failures are not retried.
    pub async fn generate<C>(
        &self,
        client: &C,
        corpus: &str,
        api_key: &str,
    ) -> Result<String, GenerationError>
    where
        C: CompletionClient + Sync + ?Sized,
    {
        if corpus.is_empty() || api_key.is_empty() {
            return Err(GenerationError::MissingInput);
        }

        let request = self.request(corpus);
        match client.complete(api_key, &request).await {
            Ok(brochure) => {
                ::log::info!("Model returned {} characters", brochure.len());
                Ok(brochure)
            }
            Err(e) => {
                ::log::error!("Brochure generation failed: {}", e);
                Err(e)
            }
        }
    }
}
