use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use subburn_av::ToolsConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory for final videos; working areas are created inside it.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Keep `processing_<id>/` after the run.
    #[serde(default = "default_keep_workdir")]
    pub keep_workdir: bool,

    /// Deadline for the whole run, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub languages: LanguageConfig,

    #[serde(default)]
    pub subtitle_mode: SubtitleMode,

    #[serde(default)]
    pub resolver: ResolverKind,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_keep_workdir() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            keep_workdir: default_keep_workdir(),
            timeout_secs: default_timeout_secs(),
            languages: LanguageConfig::default(),
            subtitle_mode: SubtitleMode::default(),
            resolver: ResolverKind::default(),
            tools: ToolsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageConfig {
    /// Language of the subtitles fetched for backend translation.
    #[serde(default = "default_source_lang")]
    pub source: String,

    /// Language burned into the final video.
    #[serde(default = "default_target_lang")]
    pub target: String,
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "zh".to_string()
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: default_source_lang(),
            target: default_target_lang(),
        }
    }
}

/// How translated subtitles are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SubtitleMode {
    /// Fetch source-language subtitles, then translate them with the chat backend.
    #[default]
    TranslateBackend,
    /// Ask the transcript tool for machine-translated subtitles directly.
    FetchTranslated,
}

/// How the video identifier is derived from the reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
    /// Parse the canonical URL shapes locally.
    #[default]
    Parse,
    /// Ask yt-dlp to print the identifier.
    YtDlp,
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Credentials and endpoint for the chat translation backend.
///
/// Built once at startup and handed only to the translator.
#[derive(Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl TranslationConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
        let base_url = get("OPENAI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}
