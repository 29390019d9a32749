//! Burn subtitles into the video using ffmpeg.

use std::path::{Path, PathBuf};

use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, FFMPEG};

/// Style applied to burned-in subtitles.
const SUBTITLE_STYLE: &str = "FontSize=16,Alignment=2";

/// `<id>_final_with_<lang>_subs.mp4`
pub fn final_file_name(id: &VideoId, lang: &str) -> String {
    format!("{id}_final_with_{lang}_subs.mp4")
}

/// Backslash-escape every char of `value` found in `special`.
fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a path for use as a filter option value inside `-vf`.
///
/// ffmpeg unescapes twice: the filtergraph parser first, then the filter's
/// option parser. So the option level (`\ ' :`) is escaped first and the
/// graph level (`\ ' [ ] , ;`) on top of it.
fn escape_filter_path(path: &Path) -> String {
    let option_level = escape_chars(&path.to_string_lossy(), &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

/// Build the ffmpeg argument list.
///
/// With `burn_subtitles` the audio is copied and the video re-encoded through
/// the `subtitles` filter; without it every stream is copied.
pub fn merge_args(video: &Path, subtitles: &Path, output: &Path, burn_subtitles: bool) -> Vec<String> {
    let mut args = vec!["-i".to_string(), video.to_string_lossy().to_string()];
    if burn_subtitles {
        args.extend([
            "-c:a".to_string(),
            "copy".to_string(),
            "-vf".to_string(),
            format!(
                "subtitles={}:force_style='{SUBTITLE_STYLE}'",
                escape_filter_path(subtitles)
            ),
        ]);
    } else {
        args.extend(["-c".to_string(), "copy".to_string()]);
    }
    args.extend(["-y".to_string(), output.to_string_lossy().to_string()]);
    args
}

/// Merge `video` and `subtitles` into `<output_dir>/<id>_final_with_<lang>_subs.mp4`.
///
/// A zero-byte subtitle file skips burning and copies streams instead. If
/// ffmpeg fails, any partial output file is removed before the error is
/// returned.
///
/// # Errors
///
/// - [`Error::ArtifactNotFound`] if the subtitle file is missing, or if the
///   output file is absent after ffmpeg reported success.
/// - [`Error::ToolNotFound`] / [`Error::ExternalTool`] from ffmpeg.
pub async fn merge_video_subtitles(
    tools: &ToolRegistry,
    video: &Path,
    subtitles: &Path,
    output_dir: &Path,
    id: &VideoId,
    lang: &str,
    deadline: Instant,
) -> Result<PathBuf> {
    tracing::info!(video = %video.display(), subtitles = %subtitles.display(), "Starting video and subtitle merge");
    let program = tools.require(FFMPEG)?;

    let subtitle_len = tokio::fs::metadata(subtitles)
        .await
        .map_err(|_| Error::artifact_not_found(subtitles.display().to_string()))?
        .len();
    let burn = subtitle_len > 0;
    if !burn {
        tracing::warn!("Subtitle file is empty, copying video without subtitles");
    }

    let final_path = output_dir.join(final_file_name(id, lang));
    let result = ToolCommand::new(program.to_path_buf())
        .args(merge_args(video, subtitles, &final_path, burn))
        .deadline(deadline)
        .execute()
        .await;

    if let Err(e) = result {
        if tokio::fs::remove_file(&final_path).await.is_ok() {
            tracing::warn!(path = %final_path.display(), "Removed incomplete output file");
        }
        return Err(e);
    }

    if !tokio::fs::metadata(&final_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        tracing::error!(path = %final_path.display(), "ffmpeg reported success, but final output file not found");
        return Err(Error::artifact_not_found(final_path.display().to_string()));
    }

    tracing::info!(path = %final_path.display(), burned = burn, "Video and subtitles merged successfully");
    Ok(final_path)
}
