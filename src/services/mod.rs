pub mod pronunciation;
pub mod tts_provider;
