/// External speech-to-text capability, stateless per call.
///
/// Input is a complete self-describing WAV container (16-bit mono). Every
/// call re-transcribes the entire rolling window; the engine carries no
/// decode state between calls.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, wav_bytes: &[u8]) -> crate::Result<String>;

    fn model_name(&self) -> &str {
        "unknown"
    }
}
