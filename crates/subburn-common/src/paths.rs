//! Path utilities for detecting file types by extension.
//!
//! These back the fallback search of the acquisition stage, where the
//! download tool may pick a container other than the one requested.

use std::path::Path;

/// Video container extensions accepted as a downloaded video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "avi", "mov", "m4v"];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subburn_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("abc123.mp4")));
/// assert!(is_video_file(Path::new("/work/abc123.WEBM")));
/// assert!(!is_video_file(Path::new("abc123_en.srt")));
/// assert!(!is_video_file(Path::new("abc123.mp4.part")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    has_extension_in(path, VIDEO_EXTENSIONS)
}

/// Get the list of video file extensions.
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extensions() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("a.mkv")));
        assert!(is_video_file(Path::new("a.webm")));
        assert!(is_video_file(Path::new("a.avi")));
        assert!(!is_video_file(Path::new("a.m4a")));
        assert!(!is_video_file(Path::new("a.part")));
        assert!(!is_video_file(Path::new("noext")));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_video_file(Path::new("A.MKV")));
    }

    #[test]
    fn test_video_extensions_list() {
        assert!(video_extensions().contains(&"webm"));
    }
}
