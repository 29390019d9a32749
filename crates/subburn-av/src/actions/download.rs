//! Video acquisition using yt-dlp.

use std::path::{Path, PathBuf};

use subburn_common::paths::{is_video_file, video_extensions};
use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, YT_DLP};

/// Prefer an mp4 video+audio pair, then the best single mp4, then anything.
pub const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Container requested for merged downloads.
const MERGE_CONTAINER: &str = "mp4";

/// Build the yt-dlp argument list.
///
/// `output_template` is a path whose extension placeholder (`%(ext)s`) the
/// tool fills in.
pub fn download_args(reference: &str, output_template: &Path) -> Vec<String> {
    vec![
        "-f".to_string(),
        VIDEO_FORMAT.to_string(),
        "--merge-output-format".to_string(),
        MERGE_CONTAINER.to_string(),
        "-o".to_string(),
        output_template.to_string_lossy().to_string(),
        "--no-playlist".to_string(),
        "--progress".to_string(),
        "--no-warnings".to_string(),
        reference.to_string(),
    ]
}

/// Download the best-quality video for `reference` into `work_dir` and
/// return the path of the produced file.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if yt-dlp is not available.
/// - [`Error::ExternalTool`] if yt-dlp fails or the deadline expires.
/// - [`Error::ArtifactNotFound`] if no video file can be located afterwards.
pub async fn download_video(
    tools: &ToolRegistry,
    reference: &str,
    id: &VideoId,
    work_dir: &Path,
    deadline: Instant,
) -> Result<PathBuf> {
    tracing::info!(url = reference, "Starting video download");
    let program = tools.require(YT_DLP)?;

    let template = work_dir.join(format!("{id}.%(ext)s"));
    ToolCommand::new(program.to_path_buf())
        .args(download_args(reference, &template))
        .deadline(deadline)
        .execute()
        .await?;

    resolve_video_file(work_dir, id)
}

/// Locate the downloaded video in `work_dir`.
///
/// 1. `<id>.mp4` if it exists.
/// 2. Otherwise the first `<id>.*` file, in name order, whose extension is a
///    known video container.
///
/// Read-only, so repeated calls against an unchanged directory agree.
///
/// # Errors
///
/// Returns [`Error::ArtifactNotFound`] naming the searched pattern when
/// neither tier yields a file.
pub fn resolve_video_file(work_dir: &Path, id: &VideoId) -> Result<PathBuf> {
    let expected = work_dir.join(format!("{id}.{MERGE_CONTAINER}"));
    if expected.is_file() {
        tracing::info!(path = %expected.display(), "Confirmed downloaded video file");
        return Ok(expected);
    }

    let pattern = work_dir.join(format!("{id}.*"));
    tracing::warn!(
        expected = %expected.display(),
        "Expected video file not found directly, attempting to find it"
    );

    let prefix = format!("{id}.");
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(work_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    candidates.sort();

    match candidates
        .into_iter()
        .find(|path| path.is_file() && is_video_file(path))
    {
        Some(found) => {
            tracing::info!(path = %found.display(), "Found downloaded video file");
            Ok(found)
        }
        None => {
            tracing::error!(
                pattern = %pattern.display(),
                extensions = ?video_extensions(),
                "Could not find downloaded video file"
            );
            Err(Error::artifact_not_found(pattern.display().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn id() -> VideoId {
        VideoId::parse("abc123", "test").unwrap()
    }

    #[test]
    fn args_disable_playlists_and_force_mp4() {
        let args = download_args("https://youtu.be/abc123", Path::new("/w/abc123.%(ext)s"));
        assert_eq!(&args[..2], ["-f", VIDEO_FORMAT]);
        assert!(args.windows(2).any(|w| w == ["--merge-output-format", "mp4"]));
        assert!(args.windows(2).any(|w| w == ["-o", "/w/abc123.%(ext)s"]));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
    }

    #[test]
    fn exact_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123.mp4"), b"v").unwrap();
        fs::write(dir.path().join("abc123.mkv"), b"v").unwrap();
        let path = resolve_video_file(dir.path(), &id()).unwrap();
        assert_eq!(path, dir.path().join("abc123.mp4"));
    }

    #[test]
    fn fallback_selects_other_container() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123.webm"), b"v").unwrap();
        let path = resolve_video_file(dir.path(), &id()).unwrap();
        assert_eq!(path, dir.path().join("abc123.webm"));
    }

    #[test]
    fn fallback_skips_non_video_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123.en.vtt"), b"s").unwrap();
        fs::write(dir.path().join("abc123.webm.part"), b"p").unwrap();
        fs::write(dir.path().join("abc123.mkv"), b"v").unwrap();
        fs::write(dir.path().join("other.mp4"), b"v").unwrap();
        let path = resolve_video_file(dir.path(), &id()).unwrap();
        assert_eq!(path, dir.path().join("abc123.mkv"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123.webm"), b"v").unwrap();
        fs::write(dir.path().join("abc123.mkv"), b"v").unwrap();
        let first = resolve_video_file(dir.path(), &id()).unwrap();
        let second = resolve_video_file(dir.path(), &id()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nothing_found_names_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123_en.srt"), b"s").unwrap();
        let err = resolve_video_file(dir.path(), &id()).unwrap_err();
        match err {
            Error::ArtifactNotFound { pattern } => assert!(pattern.ends_with("abc123.*")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_named_like_video_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("abc123.mp4")).unwrap();
        assert!(resolve_video_file(dir.path(), &id()).is_err());
    }
}
