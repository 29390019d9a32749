//! Subtitle download using youtube_transcript_api.

use std::path::{Path, PathBuf};

use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, TRANSCRIPT};

/// Subtitle format requested from the transcript tool.
pub const SUBTITLE_FORMAT: &str = "srt";

/// Which subtitles to ask the transcript tool for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleRequest {
    /// Subtitles in the given source language, untranslated.
    Source(String),
    /// Subtitles machine-translated by the tool into the given language.
    Translated(String),
}

impl SubtitleRequest {
    /// The language the produced file is in.
    pub fn language(&self) -> &str {
        match self {
            SubtitleRequest::Source(lang) | SubtitleRequest::Translated(lang) => lang,
        }
    }

    /// `<id>_<lang>.srt`
    pub fn file_name(&self, id: &VideoId) -> String {
        format!("{id}_{}.{SUBTITLE_FORMAT}", self.language())
    }
}

/// Build the transcript tool argument list.
pub fn transcript_args(id: &VideoId, request: &SubtitleRequest) -> Vec<String> {
    let (flag, lang) = match request {
        SubtitleRequest::Source(lang) => ("--languages", lang),
        SubtitleRequest::Translated(lang) => ("--translate", lang),
    };
    vec![
        flag.to_string(),
        lang.clone(),
        "--format".to_string(),
        SUBTITLE_FORMAT.to_string(),
        id.to_string(),
    ]
}

/// Fetch subtitles for `id` and write them to `<work_dir>/<id>_<lang>.srt`.
///
/// The tool's standard output is written verbatim. Standard error is left
/// out on purpose, so tool warnings never end up inside the SRT; it still
/// shows in the error when the tool fails. An empty result is handled per
/// request kind:
///
/// - [`SubtitleRequest::Source`]: written as a zero-byte file, so the run can
///   still produce a video without burned-in subtitles.
/// - [`SubtitleRequest::Translated`]: [`Error::EmptyArtifact`].
///
/// # Errors
///
/// - [`Error::ToolNotFound`] / [`Error::ExternalTool`] from the tool.
/// - [`Error::EmptyArtifact`] as described above.
/// - [`Error::ArtifactNotFound`] if the written file cannot be confirmed.
pub async fn download_subtitles(
    tools: &ToolRegistry,
    id: &VideoId,
    work_dir: &Path,
    request: &SubtitleRequest,
    deadline: Instant,
) -> Result<PathBuf> {
    tracing::info!(language = request.language(), "Starting subtitle download");
    let program = tools.require(TRANSCRIPT)?;

    let output = ToolCommand::new(program.to_path_buf())
        .args(transcript_args(id, request))
        .deadline(deadline)
        .execute()
        .await?;

    if output.stdout.is_empty() {
        match request {
            SubtitleRequest::Translated(_) => {
                return Err(Error::EmptyArtifact {
                    what: TRANSCRIPT.to_string(),
                })
            }
            SubtitleRequest::Source(_) => {
                tracing::warn!("Transcript tool returned no subtitles, writing an empty subtitle file");
            }
        }
    }

    let srt_path = work_dir.join(request.file_name(id));
    tokio::fs::write(&srt_path, &output.stdout).await?;

    if !tokio::fs::metadata(&srt_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        tracing::error!(path = %srt_path.display(), "Subtitle tool ran but output SRT file not found");
        return Err(Error::artifact_not_found(srt_path.display().to_string()));
    }

    tracing::info!(path = %srt_path.display(), bytes = output.stdout.len(), "Subtitles downloaded successfully");
    Ok(srt_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::parse("abc123", "test").unwrap()
    }

    #[test]
    fn source_args() {
        let args = transcript_args(&id(), &SubtitleRequest::Source("en".into()));
        assert_eq!(args, ["--languages", "en", "--format", "srt", "abc123"]);
    }

    #[test]
    fn translated_args() {
        let args = transcript_args(&id(), &SubtitleRequest::Translated("zh-Hans".into()));
        assert_eq!(args, ["--translate", "zh-Hans", "--format", "srt", "abc123"]);
    }

    #[test]
    fn file_name_uses_language() {
        assert_eq!(
            SubtitleRequest::Source("en".into()).file_name(&id()),
            "abc123_en.srt"
        );
        assert_eq!(
            SubtitleRequest::Translated("zh".into()).file_name(&id()),
            "abc123_zh.srt"
        );
    }

    #[tokio::test]
    async fn missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_subtitles(
            &ToolRegistry::default(),
            &id(),
            dir.path(),
            &SubtitleRequest::Source("en".into()),
            Instant::now() + std::time::Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    mod with_fake_tool {
        use super::*;
        use crate::tools::ToolsConfig;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        fn registry(dir: &Path, body: &str) -> ToolRegistry {
            let path = dir.join("youtube_transcript_api");
            std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            ToolRegistry::discover(&ToolsConfig {
                transcript_path: Some(path),
                ..ToolsConfig::default()
            })
        }

        fn deadline() -> Instant {
            Instant::now() + Duration::from_secs(10)
        }

        #[tokio::test]
        async fn writes_stdout_verbatim() {
            let tools_dir = tempfile::tempdir().unwrap();
            let work = tempfile::tempdir().unwrap();
            let tools = registry(tools_dir.path(), "printf '1\\n00:00:01,000 --> 00:00:02,000\\nHi\\n'\n");
            let path = download_subtitles(
                &tools,
                &id(),
                work.path(),
                &SubtitleRequest::Source("en".into()),
                deadline(),
            )
            .await
            .unwrap();
            assert_eq!(path, work.path().join("abc123_en.srt"));
            assert_eq!(
                std::fs::read_to_string(&path).unwrap(),
                "1\n00:00:01,000 --> 00:00:02,000\nHi\n"
            );
        }

        #[tokio::test]
        async fn empty_source_output_yields_empty_file() {
            let tools_dir = tempfile::tempdir().unwrap();
            let work = tempfile::tempdir().unwrap();
            let tools = registry(tools_dir.path(), "exit 0\n");
            let path = download_subtitles(
                &tools,
                &id(),
                work.path(),
                &SubtitleRequest::Source("en".into()),
                deadline(),
            )
            .await
            .unwrap();
            assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        }

        #[tokio::test]
        async fn empty_translated_output_fails() {
            let tools_dir = tempfile::tempdir().unwrap();
            let work = tempfile::tempdir().unwrap();
            let tools = registry(tools_dir.path(), "exit 0\n");
            let err = download_subtitles(
                &tools,
                &id(),
                work.path(),
                &SubtitleRequest::Translated("zh".into()),
                deadline(),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, Error::EmptyArtifact { .. }));
            assert!(!work.path().join("abc123_zh.srt").exists());
        }

        #[tokio::test]
        async fn stderr_does_not_leak_into_subtitles() {
            let tools_dir = tempfile::tempdir().unwrap();
            let work = tempfile::tempdir().unwrap();
            let tools = registry(tools_dir.path(), "echo 'warning' >&2\nprintf 'body'\n");
            let path = download_subtitles(
                &tools,
                &id(),
                work.path(),
                &SubtitleRequest::Source("en".into()),
                deadline(),
            )
            .await
            .unwrap();
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "body");
        }
    }
}
