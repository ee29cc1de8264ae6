use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::REFERER;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::engine::SpeechEngine;
use crate::error::AppError;
use crate::text::{self, MAX_CHUNK_CHARS};

const RPC_ID: &str = "jQ1olc";
const REFERER_URL: &str = "http://translate.google.com/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36";

lazy_static! {
    // [["wrb.fr","jQ1olc","[\"<base64 mp3>\"]",null,null,null,"generic"]]
    static ref AUDIO_REGEX: Regex = Regex::new(r#"jQ1olc","\[\\"(.*)\\"\]"#).unwrap();
}

/// Speech engine backed by Google Translate's read-aloud endpoint.
pub struct GoogleTranslateEngine {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateEngine {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Engine(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn request_chunk(&self, chunk: &str, locale: &str, slow: bool) -> Result<Vec<u8>, AppError> {
        let payload = rpc_payload(chunk, locale, slow)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(REFERER, REFERER_URL)
            .form(&[("f.req", payload)])
            .send()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to connect to TTS API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Engine(failure_message(status, &self.endpoint)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to read TTS response: {}", e)))?;

        extract_audio(&body)
    }
}

#[async_trait]
impl SpeechEngine for GoogleTranslateEngine {
    async fn synthesize(&self, text: &str, locale: &str, slow: bool) -> Result<Vec<u8>, AppError> {
        let chunks = text::chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AppError::Engine("No text to send to TTS API".into()));
        }

        tracing::debug!("Synthesizing {} chunk(s) in '{}'", chunks.len(), locale);

        let mut audio = Vec::new();
        for chunk in &chunks {
            audio.extend(self.request_chunk(chunk, locale, slow).await?);
        }

        tracing::debug!("Received {} bytes of audio", audio.len());
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google-translate"
    }
}

/// Build the `f.req` form value: an RPC envelope whose argument list is itself
/// JSON-encoded as a string.
pub fn rpc_payload(text: &str, locale: &str, slow: bool) -> Result<String, serde_json::Error> {
    let speed = if slow { Value::Bool(true) } else { Value::Null };
    let parameter = serde_json::to_string(&json!([text, locale, speed, "null"]))?;
    serde_json::to_string(&json!([[[RPC_ID, parameter, null, "generic"]]]))
}

/// Pull every base64 audio payload out of a batchexecute response, in order.
pub fn extract_audio(body: &str) -> Result<Vec<u8>, AppError> {
    let mut audio = Vec::new();

    for cap in AUDIO_REGEX.captures_iter(body) {
        let decoded = STANDARD
            .decode(&cap[1])
            .map_err(|e| AppError::Engine(format!("Invalid audio payload: {}", e)))?;
        audio.extend(decoded);
    }

    if audio.is_empty() {
        return Err(AppError::Engine(
            "No audio stream in response. Unsupported language?".into(),
        ));
    }

    Ok(audio)
}

fn failure_message(status: StatusCode, endpoint: &str) -> String {
    let cause = if status == StatusCode::FORBIDDEN {
        "Bad token or upstream API changes"
    } else if status == StatusCode::NOT_FOUND && !endpoint.contains("translate.google.com/") {
        "Unsupported tld"
    } else if status.is_server_error() {
        "Upstream API error. Try again later."
    } else {
        "Unknown"
    };

    format!("{} from TTS API. Probable cause: {}", status, cause)
}
