use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talkdub::batch::{BatchCoordinator, BatchReport, BatchStatus, find_wav_files};
use talkdub::cli::{Cli, Commands, ConfigAction};
use talkdub::config::{Config, ResolvedConfig, load_env_file};
use talkdub::defaults;
use talkdub::logging::init_logger;
use talkdub::pipeline::{DialoguePipeline, ProcessOutcome, validate_input};

/// Segments printed after a preview run.
const PREVIEW_SHOWN: usize = 5;

/// Environment file read from the working directory.
const ENV_FILE: &str = ".env";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_file = load_env_file(Path::new(ENV_FILE));
    init_logger(cli.quiet, cli.verbose);
    if let Err(e) = env_file {
        log::warn!("Ignoring {}: {}", ENV_FILE, e);
    }

    match cli.command {
        Commands::Process {
            input,
            output,
            preview,
            voice_female,
            voice_male,
            concurrent,
        } => {
            let resolved = load_config(cli.config.as_deref())?
                .resolve()?
                .with_voices(voice_female, voice_male)
                .with_batch_concurrency(concurrent);

            if input.is_dir() {
                if preview {
                    bail!("--preview is only supported for a single file");
                }
                let output = output.unwrap_or_else(|| PathBuf::from(defaults::BATCH_OUTPUT_DIR));
                process_directory(&resolved, &input, &output, cli.quiet).await?;
            } else {
                let output = output.unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_DIR));
                process_file(&resolved, &input, &output, preview, cli.quiet).await?;
            }
        }
        Commands::Config { action } => {
            let config = load_config(cli.config.as_deref())?;
            match action {
                ConfigAction::Show => show_config(&config)?,
                ConfigAction::Check => check_config(&config)?,
                ConfigAction::Dump => print!("{}", Config::dump_template()),
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "talkdub", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file (if specified) or default location, then
/// apply environment variable overrides.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides())
}

async fn process_file(
    resolved: &ResolvedConfig,
    input: &Path,
    output: &Path,
    preview: bool,
    quiet: bool,
) -> Result<()> {
    validate_input(input)?;
    let pipeline = DialoguePipeline::from_config(resolved);

    if preview {
        let outcome = pipeline.preview(input, output).await?;
        if !quiet {
            print_preview(&outcome);
        }
        return Ok(());
    }

    match pipeline.run(input, output).await? {
        Some(outcome) => {
            if !quiet {
                print_outcome(&outcome);
            }
            Ok(())
        }
        None => {
            eprintln!(
                "{}",
                format!("No speech segments found in {}", input.display()).red()
            );
            std::process::exit(1);
        }
    }
}

async fn process_directory(
    resolved: &ResolvedConfig,
    input: &Path,
    output: &Path,
    quiet: bool,
) -> Result<()> {
    let files = find_wav_files(input, Some(output))?;
    if files.is_empty() {
        eprintln!(
            "{}",
            format!("No .wav files found in {}", input.display()).red()
        );
        std::process::exit(1);
    }

    let pipeline = Arc::new(DialoguePipeline::from_config(resolved));
    let coordinator = BatchCoordinator::new(pipeline, resolved.batch_max_concurrent);

    let cancel = coordinator.cancel_handle();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!(
            "{}",
            "Interrupted: finishing files already in progress (Ctrl-C again to abort)".yellow()
        );
        watcher.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Aborted".red());
            std::process::exit(130);
        }
    });

    let report = coordinator.run(input, &files, output).await?;
    if !quiet {
        print_batch_report(&report, output);
    }
    if cancel.is_cancelled() {
        eprintln!(
            "{}",
            format!(
                "Batch interrupted: {} of {} files not processed",
                report.cancelled(),
                report.total_files
            )
            .red()
        );
        std::process::exit(1);
    }
    Ok(())
}

fn print_preview(outcome: &ProcessOutcome) {
    println!(
        "{} {} segments -> {}",
        "Preview:".bold(),
        outcome.segments_count,
        outcome.transcript.display()
    );
    for segment in outcome.segments.iter().take(PREVIEW_SHOWN) {
        println!(
            "  {} [{}] {}",
            format!("{:>7.2}s", segment.dialogue.segment.start).dimmed(),
            segment.dialogue.speaker.cyan(),
            segment.original_text
        );
        println!("             {}", segment.translated_text.green());
    }
    if outcome.segments.len() > PREVIEW_SHOWN {
        println!(
            "  ... {} more",
            outcome.segments.len() - PREVIEW_SHOWN
        );
    }
}

fn print_outcome(outcome: &ProcessOutcome) {
    println!("{}", "✓ Done".green().bold());
    println!("  Segments:   {}", outcome.segments_count);
    println!("  Duration:   {:.2} seconds", outcome.total_duration);
    println!("  Transcript: {}", outcome.transcript.display());
    match &outcome.chinese_audio {
        Some(path) => println!("  Audio:      {}", path.display()),
        None => println!("  Audio:      {}", "none (every segment failed to synthesize)".yellow()),
    }
}

fn print_batch_report(report: &BatchReport, output: &Path) {
    println!(
        "{} {}: {}/{} succeeded",
        "Batch".bold(),
        report.batch_id,
        report.successful,
        report.total_files
    );
    for result in &report.results {
        let status = match result.status {
            BatchStatus::Success => "success".green().to_string(),
            BatchStatus::Failed => "failed".yellow().to_string(),
            BatchStatus::Error => "error".red().to_string(),
        };
        match &result.error {
            Some(message) => println!("  {} {} ({})", status, result.input_file.display(), message),
            None => println!("  {} {}", status, result.input_file.display()),
        }
    }
    println!(
        "  Report: {}",
        output.join(defaults::BATCH_REPORT_FILE).display()
    );
}

fn show_config(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{}", toml_str);

    let key_state = |key: &Option<String>| {
        if key.is_some() {
            "set".green().to_string()
        } else {
            "unset".dimmed().to_string()
        }
    };
    println!("[credentials]");
    println!("OPENAI_API_KEY = {}", key_state(&config.credentials.openai_api_key));
    println!("GEMINI_API_KEY = {}", key_state(&config.credentials.gemini_api_key));
    println!("TTS_API_KEY = {}", key_state(&config.credentials.tts_api_key));
    println!();

    let resolved = config.resolve()?;
    println!("Effective translation provider: {}", resolved.provider.bold());
    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    let resolved = config.resolve()?;
    if resolved.warnings.is_empty() {
        println!("{}", "✓ Configuration OK".green());
    } else {
        for warning in &resolved.warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
    }
    Ok(())
}
