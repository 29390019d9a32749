//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! programs the pipeline drives (yt-dlp, youtube_transcript_api, ffmpeg) and
//! provides lookup methods for the stages.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use subburn_common::{Error, Result};

/// Download tool.
pub const YT_DLP: &str = "yt-dlp";
/// Transcript tool.
pub const TRANSCRIPT: &str = "youtube_transcript_api";
/// Mux tool.
pub const FFMPEG: &str = "ffmpeg";

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &[YT_DLP, TRANSCRIPT, FFMPEG];

/// Optional per-tool path overrides. Unset tools are looked up in `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,

    #[serde(default)]
    pub transcript_path: Option<PathBuf>,

    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

impl ToolsConfig {
    fn custom_path(&self, name: &str) -> Option<&Path> {
        match name {
            YT_DLP => self.yt_dlp_path.as_deref(),
            TRANSCRIPT => self.transcript_path.as_deref(),
            FFMPEG => self.ffmpeg_path.as_deref(),
            _ => None,
        }
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of the version output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool paths.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// A configured path is used when it exists; otherwise [`which::which`]
    /// locates the tool. Tools that are not found are omitted, so the failure
    /// surfaces from [`require`](Self::require) in the stage that needs them.
    pub fn discover(config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let resolved = match config.custom_path(name) {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(tool = name, path = %p.display(), "Configured tool path does not exist, falling back to PATH");
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            match resolved {
                Some(path) => {
                    tracing::debug!(tool = name, path = %path.display(), "Executable found");
                    tools.insert(name.to_string(), path);
                }
                None => tracing::debug!(tool = name, "Executable not found"),
            }
        }

        Self { tools }
    }

    /// Return the path for the given tool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if the tool was not found during
    /// discovery.
    pub fn require(&self, name: &str) -> Result<&Path> {
        match self.tools.get(name) {
            Some(path) => Ok(path.as_path()),
            None => {
                tracing::error!(executable = name, "Required executable not found in PATH");
                Err(Error::tool_not_found(name))
            }
        }
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(path) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, path),
                    path: Some(path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> --version` (or `-version` for ffmpeg) and return the first
/// line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        FFMPEG => "-version",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
