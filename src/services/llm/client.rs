use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::SentenceAssembler;
use crate::config::IshaaraConfig;
use crate::detector::SignLabel;
use crate::error::AssemblyError;
use crate::kernel::state::join_words;

const PROMPT_PREFIX: &str = "Convert these sign language gestures into a meaningful sentence, focusing only on the content without mentioning sign language or gestures";

/// Remote sentence assembly against a Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiAssembler {
    client: Client,
    endpoint: String,
    api_key: String,
    /// Decode non-2xx bodies like successful ones instead of failing on status.
    lenient_status: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GeminiAssembler {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("No Gemini API key configured; remote assembly will likely be rejected");
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
            api_key,
            lenient_status: false,
        }
    }

    pub fn with_lenient_status(mut self, lenient: bool) -> Self {
        self.lenient_status = lenient;
        self
    }

    /// Lenient about status codes exactly when empty completions are accepted.
    pub fn from_config(config: &IshaaraConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout_ms.map(Duration::from_millis),
        )
        .with_lenient_status(!config.empty_completion_is_error)
    }
}

impl SentenceAssembler for GeminiAssembler {
    fn assemble(&self, words: Vec<SignLabel>) -> impl Future<Output = Result<String, AssemblyError>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let lenient_status = self.lenient_status;

        async move {
            let body = request_body(&words);
            debug!("POST {} ({} word(s))", endpoint, words.len());

            let mut req = client.post(&endpoint).json(&body);
            if !api_key.is_empty() {
                req = req.query(&[("key", api_key.as_str())]);
            }
            let response = req.send().await?;

            let status = response.status();
            if status.is_success() {
                let raw = response.text().await?;
                return parse_completion(&raw);
            }
            if !lenient_status {
                return Err(AssemblyError::Status(status.as_u16()));
            }

            // Any JSON body is taken at face value; anything else keeps the status.
            let raw = response.text().await?;
            match parse_completion(&raw) {
                Ok(text) => {
                    warn!("Gemini answered {} with a JSON body; using it", status);
                    Ok(text)
                }
                Err(_) => Err(AssemblyError::Status(status.as_u16())),
            }
        }
    }
}

/// Prompt text for a buffer: every word, in order, comma separated.
pub fn build_prompt(words: &[SignLabel]) -> String {
    format!("{}: {}", PROMPT_PREFIX, join_words(words, ", "))
}

pub fn request_body(words: &[SignLabel]) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: Some(build_prompt(words)) }],
        }],
    }
}

/// Text at `candidates[0].content.parts[0].text`, if present.
pub fn extract_text(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .as_deref()
}

/// Decodes a response body. A well-formed body without generated text yields
/// an empty string; the controller decides whether that counts as failure.
pub fn parse_completion(raw: &str) -> Result<String, AssemblyError> {
    let response: GenerateResponse =
        serde_json::from_str(raw).map_err(|e| AssemblyError::Decode(e.to_string()))?;
    Ok(extract_text(&response).map(|t| t.trim().to_string()).unwrap_or_default())
}
