//! Identifier resolution strategies.
//!
//! [`UrlResolver`] parses the canonical URL shapes locally;
//! [`CommandResolver`] asks the download tool to print the identifier. Both
//! fail with [`Error::UnrecognizedReference`] so callers treat them alike.

use async_trait::async_trait;
use subburn_common::reference::{parse_reference, parse_video_id};
use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, YT_DLP};

/// Derives a [`VideoId`] from a video reference.
#[async_trait]
pub trait IdentifierResolver: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Resolve `reference` to its identifier, honoring `deadline`.
    async fn resolve(&self, reference: &str, deadline: Instant) -> Result<VideoId>;
}

/// Pure parsing of the two canonical hosting URL shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlResolver;

#[async_trait]
impl IdentifierResolver for UrlResolver {
    fn name(&self) -> &'static str {
        "url"
    }

    async fn resolve(&self, reference: &str, _deadline: Instant) -> Result<VideoId> {
        parse_video_id(reference)
    }
}

/// Delegates to `yt-dlp --print id`, which understands every host the
/// download tool supports.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    tools: ToolRegistry,
}

impl CommandResolver {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }
}

/// Arguments asking the download tool to print the identifier only.
pub fn lookup_args(reference: &str) -> Vec<String> {
    vec![
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--print".to_string(),
        "id".to_string(),
        reference.to_string(),
    ]
}

#[async_trait]
impl IdentifierResolver for CommandResolver {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, reference: &str, deadline: Instant) -> Result<VideoId> {
        parse_reference(reference)?;
        let program = self.tools.require(YT_DLP)?;

        let output = ToolCommand::new(program.to_path_buf())
            .args(lookup_args(reference))
            .deadline(deadline)
            .execute()
            .await
            .map_err(|e| Error::unrecognized(reference, format!("identifier lookup failed: {e}")))?;

        let printed = String::from_utf8_lossy(&output.stdout);
        let token = printed.trim();
        if token.is_empty() {
            return Err(Error::unrecognized(
                reference,
                "identifier lookup printed nothing",
            ));
        }
        VideoId::parse(token, reference)
    }
}
