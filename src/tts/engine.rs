use async_trait::async_trait;

use crate::error::AppError;

/// A text-to-speech backend producing encoded MP3 bytes.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn synthesize(&self, text: &str, locale: &str, slow: bool) -> Result<Vec<u8>, AppError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
