//! Speech synthesis backends. Both return MP3 so any command-line player
//! can handle the result.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::info;

use ablage_config::{NarrationConfig, TtsProviderChoice};

const OPENAI_API: &str = "https://api.openai.com";
const ELEVENLABS_API: &str = "https://api.elevenlabs.io";

/// Text to speak, with an optional per-request voice.
#[derive(Debug, Clone)]
pub struct TtsRequest {
    pub text: String,
    pub voice: Option<String>,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }
}

#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// MP3 bytes for `req`.
    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes>;
}

async fn fetch_audio(request: RequestBuilder, provider: &str) -> Result<Bytes> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{provider}: request failed"))?
        .error_for_status()
        .with_context(|| format!("{provider}: synthesis rejected"))?;
    let audio = response
        .bytes()
        .await
        .with_context(|| format!("{provider}: reading audio"))?;
    info!(provider, bytes = audio.len(), "Speech synthesized");
    Ok(audio)
}

/// OpenAI `/v1/audio/speech`.
pub struct OpenAiTts {
    api_key: String,
    voice: String,
    base_url: String,
    client: Client,
}

impl OpenAiTts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            voice: "nova".to_string(),
            base_url: OPENAI_API.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl TtsProvider for OpenAiTts {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let body = SpeechBody {
            model: "tts-1",
            input: &req.text,
            voice: req.voice.as_deref().unwrap_or(&self.voice),
            response_format: "mp3",
        };
        let request = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        fetch_audio(request, self.name()).await
    }
}

/// ElevenLabs `/v1/text-to-speech/{voice}` with the multilingual model,
/// which handles German.
pub struct ElevenLabsTts {
    api_key: String,
    voice_id: String,
    base_url: String,
    client: Client,
}

impl ElevenLabsTts {
    pub fn new(api_key: impl Into<String>, voice_id: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: voice_id.unwrap_or_else(|| "21m00Tcm4TlvDq8ikWAM".to_string()), // Rachel
            base_url: ELEVENLABS_API.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl TtsProvider for ElevenLabsTts {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let voice = req.voice.as_deref().unwrap_or(&self.voice_id);
        let request = self
            .client
            .post(format!("{}/v1/text-to-speech/{voice}", self.base_url))
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&TextToSpeechBody {
                text: &req.text,
                model_id: "eleven_multilingual_v2",
            });
        fetch_audio(request, self.name()).await
    }
}

/// The configured backend, or `None` without an API key.
pub fn create_tts(config: &NarrationConfig) -> Option<Box<dyn TtsProvider>> {
    let api_key = config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
    let voice = config.voice.clone();
    Some(match config.provider {
        TtsProviderChoice::OpenAi => match voice {
            Some(voice) => Box::new(OpenAiTts::new(api_key).with_voice(voice)),
            None => Box::new(OpenAiTts::new(api_key)),
        },
        TtsProviderChoice::ElevenLabs => Box::new(ElevenLabsTts::new(api_key, voice)),
    })
}
