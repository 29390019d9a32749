//! # subburn-av
//!
//! External tool plumbing for the subburn pipeline.
//!
//! This crate provides:
//!
//! - **Command execution** ([`ToolCommand`]) -- async builder that runs one
//!   external process under the run deadline and captures its output.
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to yt-dlp,
//!   youtube_transcript_api and ffmpeg.
//! - **Working areas** ([`WorkingArea`]) -- per-run scratch directory with
//!   retain-or-delete release.
//! - **Identifier resolution** ([`resolve`]) -- URL parsing or delegated
//!   lookup through yt-dlp.
//! - **Action functions** ([`actions`]) -- video download, subtitle download,
//!   and subtitle burn-in.

pub mod actions;
pub mod command;
pub mod resolve;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use resolve::{CommandResolver, IdentifierResolver, UrlResolver};
pub use tools::{ToolInfo, ToolRegistry, ToolsConfig};
pub use workspace::{ensure_dir, WorkingArea};

// Action functions
pub use actions::{download_subtitles, download_video, merge_video_subtitles, SubtitleRequest};
