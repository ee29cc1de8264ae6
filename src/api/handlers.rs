use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use super::{
    timestamp, CleanupFailure, CleanupResponse, GenerateAudioRequest, HealthResponse,
    HomeResponse, StatusResponse, SYSTEM_NAME,
};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::{Language, SynthesisRequest};

pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "Sistema TTS Online",
        versao: env!("CARGO_PKG_VERSION"),
        sistema: SYSTEM_NAME,
        endpoints: vec!["/gerar-audio", "/status", "/health", "/cleanup"],
        idiomas: Language::ALL.iter().map(|lang| lang.code()).collect(),
        timestamp: timestamp(),
    })
}

pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateAudioRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let language = payload.language_code().map(str::to_owned);
    let request = SynthesisRequest::new(payload.texto, language.as_deref())?;

    let artifact = state.tts.render(&request).await?;
    let file = tokio::fs::File::open(artifact.audio_path()).await?;
    let length = file.metadata().await?.len();

    // The artifact rides along with the body stream; its lease is released and
    // its directory removed once the body is finished or dropped.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _artifact = &artifact;
        chunk
    });

    let disposition = format!("attachment; filename=\"{}\"", download_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

fn download_name() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("decisao-audio-{}.mp3", &token[..8])
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK",
        timestamp: timestamp(),
        sistema: "TTS Backend - Simples e Mágico",
        memoria_livre: "OK",
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.tts.check_engine().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                tts_service: Some("OK"),
                erro: None,
                timestamp: timestamp(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "unhealthy",
                    tts_service: None,
                    erro: Some(e.to_string()),
                    timestamp: timestamp(),
                }),
            )
        }
    }
}

pub async fn cleanup(State(state): State<Arc<AppState>>) -> Response {
    let janitor = state.janitor.clone();
    let result = match tokio::task::spawn_blocking(move || janitor.sweep()).await {
        Ok(sweep) => sweep.map_err(AppError::from),
        Err(e) => Err(AppError::Internal(format!("Cleanup task failed: {}", e))),
    };

    match result {
        Ok(count) => {
            tracing::info!("Cleanup removed {} artifact(s)", count);
            Json(CleanupResponse {
                status: "cleanup_complete",
                arquivos_removidos: count,
                timestamp: timestamp(),
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("Cleanup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CleanupFailure {
                    erro: e.to_string(),
                    timestamp: timestamp(),
                }),
            )
                .into_response()
        }
    }
}
