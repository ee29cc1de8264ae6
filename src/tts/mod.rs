pub mod engine;
pub mod google;
pub mod language;

use std::sync::Arc;

use crate::error::AppError;
use crate::scratch::{AudioArtifact, ScratchSpace};

pub use engine::SpeechEngine;
pub use google::GoogleTranslateEngine;
pub use language::Language;

pub const MAX_TEXT_CHARS: usize = 5000;

/// Sample synthesized by the health check.
const HEALTH_CHECK_TEXT: &str = "Teste";

/// A validated request to `/gerar-audio`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: Language,
}

impl SynthesisRequest {
    pub fn new(text: Option<String>, language: Option<&str>) -> Result<Self, AppError> {
        let text = text.unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Validation("Texto não fornecido".into()));
        }

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(AppError::Validation(format!(
                "Texto muito longo (máximo {} caracteres)",
                MAX_TEXT_CHARS
            )));
        }

        Ok(Self {
            text,
            language: Language::resolve(language),
        })
    }
}

pub struct TtsService {
    engine: Arc<dyn SpeechEngine>,
    scratch: ScratchSpace,
}

impl TtsService {
    pub fn new(engine: Arc<dyn SpeechEngine>, scratch: ScratchSpace) -> Self {
        Self { engine, scratch }
    }

    /// Synthesize the request and store the audio in a leased artifact.
    pub async fn render(&self, request: &SynthesisRequest) -> Result<AudioArtifact, AppError> {
        let locale = request.language.locale();

        tracing::info!(
            "Generating audio: {} chars, language '{}' (locale '{}') via {}",
            request.text.chars().count(),
            request.language.code(),
            locale,
            self.engine.name()
        );

        let audio = self.engine.synthesize(&request.text, locale, false).await?;
        self.scratch.write_artifact(&audio).await
    }

    /// Readiness check: one real synthesis of a short sample.
    pub async fn check_engine(&self) -> Result<(), AppError> {
        let audio = self
            .engine
            .synthesize(HEALTH_CHECK_TEXT, Language::Portuguese.locale(), false)
            .await?;

        if audio.is_empty() {
            return Err(AppError::Engine("Engine returned no audio".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_text() {
        for text in [None, Some(String::new())] {
            let err = SynthesisRequest::new(text, Some("pt")).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Texto não fornecido"));
        }
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let at_limit = "é".repeat(MAX_TEXT_CHARS);
        assert!(SynthesisRequest::new(Some(at_limit), None).is_ok());

        let over = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = SynthesisRequest::new(Some(over), None).unwrap_err();
        assert_eq!(err.to_string(), "Texto muito longo (máximo 5000 caracteres)");
    }

    #[test]
    fn test_language_resolution() {
        let request = SynthesisRequest::new(Some("Olá".into()), Some("de")).unwrap();
        assert_eq!(request.language, Language::Portuguese);

        let request = SynthesisRequest::new(Some("Hi".into()), Some("en")).unwrap();
        assert_eq!(request.language.locale(), "en");
    }
}
