mod doctor_cmd;
mod first_run;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, warn};

use ablage_channels::SlackNotifier;
use ablage_config::{load_and_prepare, redacted, validate, AblageConfig, KeptFilePolicy};
use ablage_core::{Collaborator, Notifier};
use ablage_logging::{init_logger, redact_secrets};
use ablage_pipeline::{Pipeline, ProcessOptions};
use ablage_scheduler::Hotfolder;
use ablage_tts::narrator_from_config;
use ablage_understanding::{PdfMetadataReader, TesseractOcr};

#[derive(Parser)]
#[command(name = "ablage")]
#[command(about = "Ablage: OCR, classify and archive scanned letters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by single-document and hotfolder mode.
#[derive(Args, Debug, Clone, Default)]
struct IntakeArgs {
    /// Slack bot token (default: SLACK_TOKEN)
    #[arg(long)]
    slack_token: Option<String>,
    /// Slack channel ID (default: SLACK_CHANNEL)
    #[arg(long)]
    slack_channel: Option<String>,
    /// Read the found tasks aloud
    #[arg(long)]
    tts: bool,
    /// Copy into the archive and leave the original in place
    #[arg(long)]
    keep: bool,
    /// Config file (default: $ABLAGE_CONFIG or ./ablage.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl IntakeArgs {
    fn apply(&self, config: &mut AblageConfig) {
        if let Some(token) = &self.slack_token {
            config.slack.token = Some(token.clone());
        }
        if let Some(channel) = &self.slack_channel {
            config.slack.channel = Some(channel.clone());
        }
    }

    fn options(&self) -> ProcessOptions {
        ProcessOptions {
            keep: self.keep,
            narrate: self.tts,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single PDF and print its summary record
    Process {
        /// The scanned PDF
        pdf: PathBuf,
        #[command(flatten)]
        intake: IntakeArgs,
    },
    /// Watch a hotfolder and process every PDF that appears
    Watch {
        /// Folder to poll (default: hotfolder.path from the config)
        folder: Option<PathBuf>,
        /// Seconds between scans
        #[arg(short, long)]
        interval: Option<u64>,
        /// With --keep, reprocess kept files on every scan
        #[arg(long)]
        reprocess_kept: bool,
        #[command(flatten)]
        intake: IntakeArgs,
    },
    /// Check external tools, credentials and configuration
    Doctor {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    first_run::check_first_run();

    match cli.command {
        Commands::Process { pdf, intake } => {
            let config = prepare(intake.config.as_deref(), |c| intake.apply(c)).await?;
            let pipeline = build_pipeline(&config);
            let record = pipeline
                .process(&pdf, &intake.options())
                .await
                .with_context(|| format!("processing {}", pdf.display()))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Watch {
            folder,
            interval,
            reprocess_kept,
            intake,
        } => {
            let config = prepare(intake.config.as_deref(), |c| {
                intake.apply(c);
                if let Some(folder) = &folder {
                    c.hotfolder.path = folder.clone();
                }
                if let Some(secs) = interval {
                    c.hotfolder.interval_secs = secs;
                }
                if reprocess_kept {
                    c.hotfolder.kept_files = KeptFilePolicy::Reprocess;
                }
            })
            .await?;
            let pipeline = build_pipeline(&config);
            Hotfolder::from_config(&config.hotfolder, &pipeline, intake.options())
                .run()
                .await?;
        }
        Commands::Doctor { config } => {
            let (config, report) = load_and_prepare(config.as_deref()).await?;
            doctor_cmd::run(&config, &report).await?;
        }
    }

    Ok(())
}

/// Load config, apply command-line overrides, start logging, validate.
async fn prepare(
    explicit: Option<&Path>,
    overrides: impl FnOnce(&mut AblageConfig),
) -> Result<AblageConfig> {
    // Validated again below, after the overrides.
    let (mut config, _) = load_and_prepare(explicit).await?;
    overrides(&mut config);
    let report = validate(&config);

    init_logger(
        &config.logging.dir,
        &config.logging.event_file,
        &config.logging.level,
    )?;

    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!(path = %err.path, "{}", err.message);
        }
        bail!("invalid configuration ({} error(s))", report.errors.len());
    }
    debug!(
        config = %redact_secrets(&redacted(&config).to_string()),
        "Effective configuration"
    );
    Ok(config)
}

fn build_pipeline(config: &AblageConfig) -> Pipeline {
    let notifier: Collaborator<dyn Notifier> = match config.slack.credentials() {
        Some((token, channel)) => Collaborator::Available(Box::new(SlackNotifier::new(token, channel))),
        None => Collaborator::unavailable("Slack token or channel not set"),
    };

    Pipeline::new(
        config,
        Box::new(TesseractOcr::new(config.ocr.clone())),
        Box::new(PdfMetadataReader),
    )
    .with_notifier(notifier)
    .with_narrator(narrator_from_config(&config.narration))
}
