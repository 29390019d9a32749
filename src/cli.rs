use clap::{ArgAction, Parser};
use std::path::PathBuf;
use subburn::config::{ResolverKind, SubtitleMode};
use subburn::logging::LogFormat;

#[derive(Parser)]
#[command(name = "subburn")]
#[command(author, version, about = "Download a video, translate its subtitles and burn them in")]
pub struct Cli {
    /// Video URL to process
    #[arg(
        long,
        required_unless_present = "check_tools",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub url: Option<String>,

    /// Directory for the final video and working areas [default: ./output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the intermediate working directory (true/false) [default: true]
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub keep_workdir: Option<bool>,

    /// Log level: DEBUG, INFO, WARN or ERROR (anything else means INFO)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language of the subtitles fetched for translation
    #[arg(long)]
    pub source_lang: Option<String>,

    /// Language of the burned-in subtitles
    #[arg(long)]
    pub target_lang: Option<String>,

    /// How translated subtitles are obtained
    #[arg(long, value_enum)]
    pub subtitle_mode: Option<SubtitleMode>,

    /// How the video ID is derived from the URL
    #[arg(long, value_enum)]
    pub resolver: Option<ResolverKind>,

    /// Deadline for the whole run, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Check that required external tools are available and exit
    #[arg(long)]
    pub check_tools: bool,
}
