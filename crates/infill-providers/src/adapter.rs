//! Provider request adaptation
//!
//! Maps a provider identifier to its completion path, default port,
//! request-body schema and streaming chunk decoder. The wire schemas here
//! mirror what each server actually speaks; nothing is negotiated at runtime.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A supported inference-server protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Ollama's `/api/generate` JSON-lines protocol
    Ollama,
    /// llama.cpp server's `/completion` SSE protocol
    LlamaCpp,
    /// LM Studio's OpenAI-compatible `/v1/completions` SSE protocol
    LmStudio,
}

/// Generation parameters shared by every provider body
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_new_tokens: u32,
}

/// Where the inference server lives and how to authenticate against it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Endpoint {
    pub hostname: String,
    /// `None` falls back to the provider's default port
    pub port: Option<u16>,
    /// `None` falls back to the provider's completion path
    pub path: Option<String>,
    pub bearer_token: Option<String>,
}

/// A wire-ready streaming request
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub url: String,
    pub body: serde_json::Value,
    pub bearer_token: Option<String>,
}

impl Provider {
    /// Parse a configured provider identifier
    ///
    /// Unknown identifiers are a configuration error; the adapter never
    /// guesses a schema.
    pub fn parse(id: &str) -> Result<Self, ProviderError> {
        match id {
            "ollama" => Ok(Provider::Ollama),
            "llamacpp" => Ok(Provider::LlamaCpp),
            "lmstudio" => Ok(Provider::LmStudio),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::LlamaCpp => "llamacpp",
            Provider::LmStudio => "lmstudio",
        }
    }

    /// Path serving fill-in-the-middle completions
    pub fn fim_api_path(&self) -> &'static str {
        match self {
            Provider::Ollama => "/api/generate",
            Provider::LlamaCpp => "/completion",
            Provider::LmStudio => "/v1/completions",
        }
    }

    /// Path serving chat turns, carried for host-side configuration UIs
    pub fn chat_api_path(&self) -> &'static str {
        match self {
            Provider::Ollama => "/api/generate",
            Provider::LlamaCpp => "/completion",
            Provider::LmStudio => "/v1/chat/completions",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Provider::Ollama => 11434,
            Provider::LlamaCpp => 8080,
            Provider::LmStudio => 1234,
        }
    }

    /// Shape the provider-specific streaming request body
    pub fn request_body(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<serde_json::Value, ProviderError> {
        let body = match self {
            Provider::Ollama => serde_json::to_value(OllamaGenerateRequest {
                model: &params.model,
                prompt,
                stream: true,
                options: OllamaOptions {
                    temperature: params.temperature,
                    num_predict: params.max_new_tokens,
                },
            })?,
            Provider::LlamaCpp => serde_json::to_value(LlamaCppCompletionRequest {
                prompt,
                stream: true,
                temperature: params.temperature,
                n_predict: params.max_new_tokens,
            })?,
            Provider::LmStudio => serde_json::to_value(OpenAiCompletionRequest {
                model: &params.model,
                prompt,
                stream: true,
                temperature: params.temperature,
                max_tokens: params.max_new_tokens,
            })?,
        };
        Ok(body)
    }

    /// Decode one framed stream chunk into its token-text fragment
    ///
    /// Returns `Ok(None)` for chunks that carry no text (metadata-only
    /// chunks); those are skipped, not treated as errors.
    pub fn decode_chunk(&self, raw: &str) -> Result<Option<String>, ProviderError> {
        match self {
            Provider::Ollama => {
                let chunk: OllamaGenerateChunk =
                    serde_json::from_str(raw).map_err(|e| ProviderError::Decode(e.to_string()))?;
                Ok(chunk.response)
            }
            Provider::LlamaCpp => {
                let chunk: LlamaCppCompletionChunk =
                    serde_json::from_str(raw).map_err(|e| ProviderError::Decode(e.to_string()))?;
                Ok(chunk.content)
            }
            Provider::LmStudio => {
                let chunk: OpenAiCompletionChunk =
                    serde_json::from_str(raw).map_err(|e| ProviderError::Decode(e.to_string()))?;
                Ok(chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.text))
            }
        }
    }

    /// Build the wire-ready request for this provider and endpoint
    pub fn stream_request(
        &self,
        endpoint: &Endpoint,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<StreamRequest, ProviderError> {
        let port = endpoint.port.unwrap_or_else(|| self.default_port());
        let path = endpoint.path.as_deref().unwrap_or_else(|| self.fim_api_path());
        Ok(StreamRequest {
            url: format!("http://{}:{}{}", endpoint.hostname, port, path),
            body: self.request_body(prompt, params)?,
            bearer_token: endpoint
                .bearer_token
                .as_deref()
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        })
    }
}

/// Ollama `/api/generate` request body
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama streaming chunk; the final chunk sets `done` with no text
#[derive(Debug, Deserialize)]
struct OllamaGenerateChunk {
    response: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

/// llama.cpp `/completion` request body
#[derive(Debug, Serialize)]
struct LlamaCppCompletionRequest<'a> {
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    n_predict: u32,
}

/// llama.cpp streaming chunk
#[derive(Debug, Deserialize)]
struct LlamaCppCompletionChunk {
    content: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    stop: bool,
}

/// OpenAI-compatible `/v1/completions` request body (LM Studio)
#[derive(Debug, Serialize)]
struct OpenAiCompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI-compatible streaming chunk
#[derive(Debug, Deserialize)]
struct OpenAiCompletionChunk {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    text: Option<String>,
}
