//! Gemini `generateContent` client used for listing suggestions.

use anyhow::{Result, bail};
use async_trait::async_trait;
use ev_market_core::Curator;
use ev_market_core::curation::{description_prompt, price_prompt};
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiCurator {
    api_key: String,
    model: String,
}

impl GeminiCurator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn generate(&self, prompt: String, temperature: f32) -> Result<String> {
        let url = format!("{GEMINI_BASE_URL}/{}:generateContent?key={}", self.model, self.api_key);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": temperature },
        });

        let response = Request::post(&url).json(&body)?.send().await?;
        if !response.ok() {
            bail!("Gemini request failed: {} {}", response.status(), response.status_text());
        }

        let reply: GenerateContentResponse = response.json().await?;
        Ok(reply.text())
    }
}

#[async_trait(?Send)]
impl Curator for GeminiCurator {
    async fn enhance_description(&self, name: &str, description: &str) -> Result<String> {
        self.generate(description_prompt(name, description), 0.7).await
    }

    async fn suggest_price(&self, tags: &[String]) -> Result<String> {
        self.generate(price_prompt(tags), 0.5).await
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated. Empty when the
    /// model returned nothing.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| candidate.content.parts.iter().map(|part| part.text.as_str()).collect())
            .unwrap_or_default()
    }
}
