//! Shared test harness for pipeline integration tests.
//!
//! [`FakeTools`] writes shell-script stand-ins for yt-dlp,
//! youtube_transcript_api and ffmpeg into a temp dir. Every script appends
//! its invocation to a shared call log so tests can assert which tools ran
//! and with which arguments. [`CountingTranslator`] replaces the chat
//! backend.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use subburn::config::SubtitleMode;
use subburn::pipeline::{Pipeline, PipelineSettings};
use subburn::translate::Translator;
use subburn_av::{ToolRegistry, ToolsConfig, UrlResolver};
use tempfile::TempDir;

pub const SOURCE_SRT: &str = "1\n00:00:01,000 --> 00:00:02,500\nHello there\n\n2\n00:00:03,000 --> 00:00:04,000\nGoodbye\n";
pub const TRANSLATED_SRT: &str = "1\n00:00:01,000 --> 00:00:02,500\n你好\n\n2\n00:00:03,000 --> 00:00:04,000\n再见\n";

pub struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    /// Tools that all succeed: yt-dlp writes an mp4, the transcript tool
    /// prints [`SOURCE_SRT`], ffmpeg writes its output file.
    pub fn new() -> Self {
        let tools = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        tools.yt_dlp_writes("mp4");
        tools.transcript_prints(SOURCE_SRT);
        tools.ffmpeg_succeeds();
        tools
    }

    fn log(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.path_of(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> '{log}'\n{body}",
            log = self.log().display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// yt-dlp fills the `-o` template with `ext` and writes a file there.
    pub fn yt_dlp_writes(&self, ext: &str) {
        let body = r#"out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
target=$(printf '%s' "$out" | sed 's/%(ext)s/EXT/')
printf 'video-bytes' > "$target"
"#
        .replace("EXT", ext);
        self.write_script("yt-dlp", &body);
    }

    pub fn yt_dlp_fails(&self) {
        self.write_script("yt-dlp", "echo 'ERROR: Video unavailable' >&2\nexit 1\n");
    }

    pub fn yt_dlp_hangs(&self) {
        self.write_script("yt-dlp", "sleep 30\n");
    }

    pub fn transcript_prints(&self, srt: &str) {
        if srt.is_empty() {
            self.write_script("youtube_transcript_api", "exit 0\n");
        } else {
            self.write_script("youtube_transcript_api", &format!("printf '%s' '{srt}'\n"));
        }
    }

    pub fn ffmpeg_succeeds(&self) {
        self.write_script(
            "ffmpeg",
            "for last; do :; done\nprintf 'merged' > \"$last\"\n",
        );
    }

    pub fn config(&self) -> ToolsConfig {
        ToolsConfig {
            yt_dlp_path: Some(self.path_of("yt-dlp")),
            transcript_path: Some(self.path_of("youtube_transcript_api")),
            ffmpeg_path: Some(self.path_of("ffmpeg")),
        }
    }

    pub fn registry(&self) -> ToolRegistry {
        ToolRegistry::discover(&self.config())
    }

    /// Logged invocations of `tool`, one argument string per call.
    pub fn calls(&self, tool: &str) -> Vec<String> {
        let prefix = format!("{tool} ");
        std::fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

/// Returns a fixed reply and counts calls.
pub struct CountingTranslator {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl CountingTranslator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for CountingTranslator {
    async fn translate(&self, _srt: &str, _target_lang: &str) -> subburn_common::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(subburn_common::Error::TranslationBackend)
    }
}

pub fn settings(output_dir: &Path, keep_workdir: bool, mode: SubtitleMode) -> PipelineSettings {
    PipelineSettings {
        output_dir: output_dir.to_path_buf(),
        keep_workdir,
        source_lang: "en".to_string(),
        target_lang: "zh".to_string(),
        subtitle_mode: mode,
    }
}

pub fn pipeline(
    tools: &FakeTools,
    settings: PipelineSettings,
    translator: Option<Arc<CountingTranslator>>,
) -> Pipeline {
    Pipeline::new(
        settings,
        tools.registry(),
        Box::new(UrlResolver),
        translator.map(|t| t as Arc<dyn Translator>),
    )
}
