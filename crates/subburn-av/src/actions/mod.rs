//! Pipeline stage actions, one module per external tool.

pub mod download;
pub mod merge;
pub mod transcript;

pub use download::{download_args, download_video, resolve_video_file};
pub use merge::{final_file_name, merge_args, merge_video_subtitles};
pub use transcript::{download_subtitles, transcript_args, SubtitleRequest};
