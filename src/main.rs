mod cli;

use subburn::config::{self, Config, SubtitleMode, TranslationConfig};
use subburn::logging::{self, LogLevel};
use subburn::pipeline::Pipeline;
use subburn_av::{ToolRegistry, ToolsConfig};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(
        LogLevel::parse_lenient(cli.log_level.as_deref()),
        cli.log_format,
    ) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Fatal error");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_config_or_default(cli.config.as_deref())?;

    if cli.check_tools {
        check_tools(&config.tools);
        return Ok(());
    }

    apply_overrides(&mut config, &cli);
    config::validate_config(&config)?;

    let url = cli
        .url
        .ok_or_else(|| anyhow::anyhow!("--url is required"))?;

    let translation = match config.subtitle_mode {
        SubtitleMode::TranslateBackend => Some(TranslationConfig::from_env()?),
        SubtitleMode::FetchTranslated => None,
    };

    let timeout = Duration::from_secs(config.timeout_secs);
    let pipeline = Pipeline::from_config(&config, translation);

    let rt = tokio::runtime::Runtime::new()?;
    let final_path = rt
        .block_on(async {
            let deadline = tokio::time::Instant::now() + timeout;
            pipeline.run(&url, deadline).await
        })
        // Display already carries the nested causes.
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", final_path.display());
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref output) = cli.output {
        config.output_dir = output.clone();
    }
    if let Some(keep) = cli.keep_workdir {
        config.keep_workdir = keep;
    }
    if let Some(ref lang) = cli.source_lang {
        config.languages.source = lang.clone();
    }
    if let Some(ref lang) = cli.target_lang {
        config.languages.target = lang.clone();
    }
    if let Some(mode) = cli.subtitle_mode {
        config.subtitle_mode = mode;
    }
    if let Some(resolver) = cli.resolver {
        config.resolver = resolver;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
}

fn check_tools(tools: &ToolsConfig) {
    println!("Checking external tools...\n");

    let mut all_ok = true;
    for tool in ToolRegistry::discover(tools).check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them before processing videos.");
    }
}
