pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SYSTEM_NAME: &str = "Simples e Mágico - Juizado Especial de Tauá";

/// Body of `POST /gerar-audio`. Both fields are optional on the wire so a
/// missing `texto` is reported as a validation error, not a parse error.
/// `idioma` accepts any JSON value; non-strings fall back like unknown codes.
#[derive(Debug, Deserialize)]
pub struct GenerateAudioRequest {
    #[serde(default)]
    pub texto: Option<String>,
    #[serde(default)]
    pub idioma: Option<Value>,
}

impl GenerateAudioRequest {
    /// `None` when absent or null; a non-string value maps to an empty code,
    /// which is outside the allow-list.
    pub fn language_code(&self) -> Option<&str> {
        self.idioma
            .as_ref()
            .map(|value| value.as_str().unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub versao: &'static str,
    pub sistema: &'static str,
    pub endpoints: Vec<&'static str>,
    pub idiomas: Vec<&'static str>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub sistema: &'static str,
    pub memoria_livre: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_service: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub status: &'static str,
    pub arquivos_removidos: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CleanupFailure {
    pub erro: String,
    pub timestamp: String,
}

/// Local wall-clock time, e.g. `2024-05-02 14:03:11.482913`.
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}
