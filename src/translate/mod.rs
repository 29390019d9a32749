//! Translation of fetched subtitles through a text-generation backend.

mod openai;

pub use openai::OpenAiTranslator;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;

/// A backend that turns a whole SRT document into another language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `srt` into `target_lang`, returning the backend's text as-is.
    async fn translate(&self, srt: &str, target_lang: &str) -> Result<String>;
}

/// `<id>_<lang>_translated.srt`
pub fn translated_file_name(id: &VideoId, target_lang: &str) -> String {
    format!("{id}_{target_lang}_translated.srt")
}

/// Number of cue timing lines in an SRT document.
fn cue_count(srt: &str) -> usize {
    srt.lines().filter(|line| line.contains("-->")).count()
}

/// Translate `source` into `<work_dir>/<id>_<lang>_translated.srt`.
///
/// A source whose trimmed content is empty produces an empty destination
/// without contacting the backend. The backend's reply is written verbatim;
/// a cue count that differs from the source is logged, not rejected.
///
/// # Errors
///
/// - [`Error::TranslationBackend`] on backend failure or deadline expiry.
/// - [`Error::EmptyTranslationResult`] if the backend returns blank text.
/// - [`Error::Io`] if reading or writing the files fails.
pub async fn translate_subtitles(
    translator: &dyn Translator,
    source: &Path,
    target_lang: &str,
    work_dir: &Path,
    id: &VideoId,
    deadline: Instant,
) -> Result<PathBuf> {
    tracing::info!(source = %source.display(), target_lang, "Starting subtitle translation");
    let destination = work_dir.join(translated_file_name(id, target_lang));

    let bytes = tokio::fs::read(source).await?;
    let content = String::from_utf8_lossy(&bytes);
    if content.trim().is_empty() {
        tracing::warn!("Source subtitle file is empty, skipping translation");
        tokio::fs::write(&destination, b"").await?;
        tracing::info!(path = %destination.display(), "Created empty translated subtitle file");
        return Ok(destination);
    }

    let started = std::time::Instant::now();
    let translated = tokio::time::timeout_at(deadline, translator.translate(&content, target_lang))
        .await
        .map_err(|_| Error::TranslationBackend("deadline exceeded".to_string()))??;

    if translated.trim().is_empty() {
        return Err(Error::EmptyTranslationResult);
    }

    let (before, after) = (cue_count(&content), cue_count(&translated));
    if before != after {
        tracing::warn!(
            source_cues = before,
            translated_cues = after,
            "Translated subtitles have a different number of cues"
        );
    }

    tokio::fs::write(&destination, translated.as_bytes()).await?;
    tracing::info!(
        path = %destination.display(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Subtitles translated successfully"
    );
    Ok(destination)
}
