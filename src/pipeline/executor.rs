use std::path::PathBuf;
use std::sync::Arc;

use subburn_av::{
    download_subtitles, download_video, ensure_dir, merge_video_subtitles, CommandResolver,
    IdentifierResolver, SubtitleRequest, ToolRegistry, UrlResolver, WorkingArea,
};
use subburn_common::{Error, Result, VideoId};
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::{Config, ResolverKind, SubtitleMode, TranslationConfig};
use crate::translate::{translate_subtitles, OpenAiTranslator, Translator};

/// Numbered pipeline steps. Numbers are fixed, so a skipped step leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DownloadVideo,
    DownloadSubtitles,
    TranslateSubtitles,
    Merge,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::DownloadVideo => 1,
            Stage::DownloadSubtitles => 2,
            Stage::TranslateSubtitles => 3,
            Stage::Merge => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::DownloadVideo => "download video",
            Stage::DownloadSubtitles => "download subtitles",
            Stage::TranslateSubtitles => "translate subtitles",
            Stage::Merge => "merge video and subtitles",
        }
    }

    fn wrap(self, err: Error) -> Error {
        err.at_step(self.number(), self.name())
    }

    fn span(self) -> tracing::Span {
        tracing::info_span!("step", n = self.number(), stage = self.name())
    }
}

/// Per-run settings taken from the resolved configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub output_dir: PathBuf,
    pub keep_workdir: bool,
    pub source_lang: String,
    pub target_lang: String,
    pub subtitle_mode: SubtitleMode,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            keep_workdir: config.keep_workdir,
            source_lang: config.languages.source.clone(),
            target_lang: config.languages.target.clone(),
            subtitle_mode: config.subtitle_mode,
        }
    }
}

/// Turns one video reference into a subtitle-burned file.
pub struct Pipeline {
    settings: PipelineSettings,
    tools: ToolRegistry,
    resolver: Box<dyn IdentifierResolver>,
    translator: Option<Arc<dyn Translator>>,
}

impl Pipeline {
    pub fn new(
        settings: PipelineSettings,
        tools: ToolRegistry,
        resolver: Box<dyn IdentifierResolver>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            settings,
            tools,
            resolver,
            translator,
        }
    }

    /// Wire up tool discovery, the configured resolver and, when given, the
    /// chat translation backend.
    pub fn from_config(config: &Config, translation: Option<TranslationConfig>) -> Self {
        let tools = ToolRegistry::discover(&config.tools);
        let resolver: Box<dyn IdentifierResolver> = match config.resolver {
            ResolverKind::Parse => Box::new(UrlResolver),
            ResolverKind::YtDlp => Box::new(CommandResolver::new(tools.clone())),
        };
        let translator = translation
            .map(|t| Arc::new(OpenAiTranslator::new(t)) as Arc<dyn Translator>);

        Self::new(PipelineSettings::from(config), tools, resolver, translator)
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run every stage for `reference` under one shared `deadline` and return
    /// the final video path.
    ///
    /// The working area is released exactly once after the stages finish,
    /// whether they succeeded or not. Stage failures come back as
    /// [`Error::Step`]; identifier and directory failures are returned
    /// unwrapped because no stage has started yet.
    pub async fn run(&self, reference: &str, deadline: Instant) -> Result<PathBuf> {
        let started = std::time::Instant::now();

        let translator = match self.settings.subtitle_mode {
            SubtitleMode::TranslateBackend => Some(self.translator.as_deref().ok_or_else(|| {
                Error::TranslationBackend("no translation backend configured".to_string())
            })?),
            SubtitleMode::FetchTranslated => None,
        };

        tracing::info!(url = reference, resolver = self.resolver.name(), "Starting processing");
        let id = self.resolver.resolve(reference, deadline).await?;

        let span = tracing::info_span!("pipeline", video_id = %id);
        async move {
            tracing::info!("Extracted video ID");
            ensure_dir(&self.settings.output_dir)?;
            let area = WorkingArea::create(&self.settings.output_dir, &id, self.settings.keep_workdir)?;

            let result = self.run_stages(reference, &id, &area, translator, deadline).await;
            area.release();

            match &result {
                Ok(path) => tracing::info!(
                    final_video = %path.display(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Processing completed successfully"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Processing failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_stages(
        &self,
        reference: &str,
        id: &VideoId,
        area: &WorkingArea,
        translator: Option<&dyn Translator>,
        deadline: Instant,
    ) -> Result<PathBuf> {
        let stage = Stage::DownloadVideo;
        let video = download_video(&self.tools, reference, id, area.path(), deadline)
            .instrument(stage.span())
            .await
            .map_err(|e| stage.wrap(e))?;

        let request = match translator {
            Some(_) => SubtitleRequest::Source(self.settings.source_lang.clone()),
            None => SubtitleRequest::Translated(self.settings.target_lang.clone()),
        };
        let stage = Stage::DownloadSubtitles;
        let mut subtitles = download_subtitles(&self.tools, id, area.path(), &request, deadline)
            .instrument(stage.span())
            .await
            .map_err(|e| stage.wrap(e))?;

        if let Some(translator) = translator {
            let stage = Stage::TranslateSubtitles;
            subtitles = translate_subtitles(
                translator,
                &subtitles,
                &self.settings.target_lang,
                area.path(),
                id,
                deadline,
            )
            .instrument(stage.span())
            .await
            .map_err(|e| stage.wrap(e))?;
        }

        let stage = Stage::Merge;
        merge_video_subtitles(
            &self.tools,
            &video,
            &subtitles,
            &self.settings.output_dir,
            id,
            &self.settings.target_lang,
            deadline,
        )
        .instrument(stage.span())
        .await
        .map_err(|e| stage.wrap(e))
    }
}
