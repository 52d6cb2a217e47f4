use serde::Serialize;

use crate::config::TtsConfig;
use crate::services::pronunciation::LanguageTag;

/// Payload returned in mock mode: an MPEG frame header followed by silence.
pub const MOCK_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00];

#[derive(Debug, Clone)]
pub struct TtsProvider {
    config: TtsConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

impl TtsProvider {
    pub fn new(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    /// Validate TTS configuration at startup.
    /// Panics if real mode is enabled without an endpoint to call.
    pub fn validate_config(config: &TtsConfig) {
        if config.enabled && !config.mock && config.api_url.trim().is_empty() {
            panic!(
                "Invalid TTS configuration: TTS_ENABLED=true and TTS_MOCK=false \
                 but TTS_API_URL is empty. Set TTS_API_URL or TTS_MOCK=true."
            );
        }
    }

    /// Fetch synthesized audio bytes for `text`.
    pub async fn synthesize(&self, text: &str, lang: LanguageTag) -> Result<Vec<u8>, TtsError> {
        if !self.config.enabled {
            return Err(TtsError::Disabled);
        }
        if self.config.mock {
            return Ok(MOCK_AUDIO.to_vec());
        }

        let response = self
            .client
            .post(&self.config.api_url)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                lang: lang.as_str(),
            })
            .send()
            .await
            .map_err(TtsError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await.map_err(TtsError::from_reqwest)?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("tts is disabled")]
    Disabled,
    #[error("tts request timed out")]
    Timeout,
    #[error("tts network error: {0}")]
    Network(String),
    #[error("tts api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
    #[error("tts returned empty audio")]
    EmptyAudio,
}

impl TtsError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Network(err.to_string())
        }
    }
}
