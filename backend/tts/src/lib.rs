pub mod engine;
pub mod narrator;

pub use engine::{create_tts, ElevenLabsTts, OpenAiTts, TtsProvider, TtsRequest};
pub use narrator::{narration_text, narrator_from_config, SpeechNarrator};
