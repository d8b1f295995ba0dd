//! Narration: synthesize speech and play it through an external player.

use std::io::ErrorKind;

use ablage_config::NarrationConfig;
use ablage_core::{Collaborator, IntakeError, Narrator, Task};
use ablage_logging::redact_secrets;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::{create_tts, TtsProvider, TtsRequest};

/// Spoken rendering of a task list.
pub fn narration_text(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "Keine Aufgaben gefunden.".to_string();
    }
    tasks
        .iter()
        .map(|t| format!("Aufgabe: {}, fällig bis {}.", t.task, t.due))
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct SpeechNarrator {
    provider: Box<dyn TtsProvider>,
    player: Vec<String>,
}

impl SpeechNarrator {
    /// `player` is the argv prefix; the audio path is appended.
    pub fn new(provider: Box<dyn TtsProvider>, player: Vec<String>) -> Self {
        Self { provider, player }
    }

    async fn play(&self, path: &std::path::Path) -> Result<(), IntakeError> {
        let Some((program, args)) = self.player.split_first() else {
            return Err(IntakeError::Narration("no audio player configured".into()));
        };
        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    IntakeError::Narration(format!("audio player '{program}' not found"))
                }
                _ => IntakeError::Narration(format!("failed to run '{program}': {e}")),
            })?;
        if !status.success() {
            return Err(IntakeError::Narration(format!(
                "audio player '{program}' exited with {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Narrator for SpeechNarrator {
    async fn narrate(&self, text: &str) -> Result<(), IntakeError> {
        info!(provider = self.provider.name(), chars = text.chars().count(), "Narrating");
        let audio = self
            .provider
            .synthesize(TtsRequest::new(text))
            .await
            .map_err(|e| IntakeError::Narration(redact_secrets(&format!("{e:#}"))))?;

        // Removed when `file` drops, after playback.
        let file = tempfile::Builder::new()
            .prefix("ablage-speech-")
            .suffix(".mp3")
            .tempfile()
            .map_err(|e| IntakeError::Narration(format!("creating audio file: {e}")))?;
        tokio::fs::write(file.path(), &audio)
            .await
            .map_err(|e| IntakeError::Narration(format!("writing audio file: {e}")))?;
        debug!(path = %file.path().display(), bytes = audio.len(), "Audio written");

        self.play(file.path()).await
    }
}

/// Wire the narrator from configuration. Without an API key it is
/// unavailable and the pipeline skips narration with a warning.
pub fn narrator_from_config(config: &NarrationConfig) -> Collaborator<dyn Narrator> {
    match create_tts(config) {
        Some(provider) => {
            Collaborator::Available(Box::new(SpeechNarrator::new(provider, config.player.clone())))
        }
        None => Collaborator::unavailable(format!(
            "no API key configured for TTS provider {:?}",
            config.provider
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use bytes::Bytes;

    struct SilentTts;

    #[async_trait]
    impl TtsProvider for SilentTts {
        fn name(&self) -> &str {
            "silent"
        }

        async fn synthesize(&self, _req: TtsRequest) -> Result<Bytes> {
            Ok(Bytes::from_static(b"ID3"))
        }
    }

    struct BrokenTts;

    #[async_trait]
    impl TtsProvider for BrokenTts {
        fn name(&self) -> &str {
            "broken"
        }

        async fn synthesize(&self, _req: TtsRequest) -> Result<Bytes> {
            anyhow::bail!("401 Unauthorized for Bearer abc.def")
        }
    }

    #[test]
    fn narrator_needs_an_api_key() {
        let narrator = narrator_from_config(&NarrationConfig::default());
        assert_eq!(
            narrator.get().err(),
            Some("no API key configured for TTS provider OpenAi")
        );

        let config = NarrationConfig {
            api_key: Some("sk-configured".into()),
            ..NarrationConfig::default()
        };
        assert!(narrator_from_config(&config).get().is_ok());
    }

    #[test]
    fn renders_tasks_as_sentences() {
        let tasks = vec![
            Task { task: "Zahlung leisten".into(), due: "31.12.2024".into() },
            Task { task: "Beleg senden".into(), due: "2.1.2025".into() },
        ];
        assert_eq!(
            narration_text(&tasks),
            "Aufgabe: Zahlung leisten, fällig bis 31.12.2024. Aufgabe: Beleg senden, fällig bis 2.1.2025."
        );
        assert_eq!(narration_text(&[]), "Keine Aufgaben gefunden.");
    }

    #[tokio::test]
    async fn missing_player_is_a_narration_error() {
        let narrator = SpeechNarrator::new(Box::new(SilentTts), vec!["ablage-no-such-player".into()]);
        let err = narrator.narrate("Hallo").await.unwrap_err();
        assert!(matches!(err, IntakeError::Narration(_)));
        assert!(err.to_string().contains("ablage-no-such-player"));
    }

    #[tokio::test]
    async fn synthesis_error_is_redacted() {
        let narrator = SpeechNarrator::new(Box::new(BrokenTts), vec!["true".into()]);
        let err = narrator.narrate("Hallo").await.unwrap_err().to_string();
        assert!(err.contains("401"));
        assert!(!err.contains("abc.def"), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn plays_through_configured_command() {
        // `true` ignores its arguments and exits 0.
        let narrator = SpeechNarrator::new(Box::new(SilentTts), vec!["true".into()]);
        narrator.narrate("Hallo").await.unwrap();
    }
}
