//! Mzansi-TTS CLI - server and one-shot tools
//!
//! Runs the HTTP service, or exercises the synthesis dispatcher and the
//! language identifier once from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mzansi_tts::audio::{inspect, AudioMime};
use mzansi_tts::language::Language;
use mzansi_tts::server::{ServerConfig, ServerState, TtsServer};
use mzansi_tts::VERSION;

/// Mzansi-TTS - speech synthesis and language identification for South
/// Africa's official languages
#[derive(Parser, Debug)]
#[command(name = "mzansi-tts")]
#[command(author, version, about, long_about = None)]
#[command(long_about = "
Mzansi-TTS serves text-to-speech and language identification for English,
Afrikaans and the nine official Bantu languages of South Africa.

Examples:
  # Run the HTTP server
  mzansi-tts serve --config config.yaml --port 5000

  # Synthesize once
  mzansi-tts synthesize --text \"Sawubona\" --lang zu --output hello.wav

  # Detect a language
  mzansi-tts detect --text \"Dumelang bagaetsho\"
")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to YAML config file
    #[arg(short, long, global = true, env = "MZANSI_TTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Synthesize speech once and write the audio to a file
    Synthesize {
        /// Text to synthesize
        #[arg(short, long)]
        text: String,

        /// Language code (unknown codes fall back to English)
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Output file; the extension follows the returned audio type
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the language of a text and print the result as JSON
    Detect {
        /// Text to classify
        #[arg(short, long)]
        text: String,
    },

    /// List supported languages
    Languages,

    /// Write a default config file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config
        .apply_env()
        .context("Invalid environment override")?;
    Ok(config)
}

fn setup_logging(verbose: bool, config_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    setup_logging(cli.verbose, &config.logging.level);

    info!("Mzansi-TTS v{}", VERSION);

    match cli.command {
        Commands::Serve { host, port } => run_serve(config, host, port).await,
        Commands::Synthesize { text, lang, output } => run_synthesize(config, &text, &lang, output).await,
        Commands::Detect { text } => run_detect(config, &text).await,
        Commands::Languages => {
            print_languages();
            Ok(())
        }
        Commands::InitConfig { output, force } => run_init_config(&output, force),
    }
}

async fn run_serve(mut config: ServerConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    TtsServer::new(config).run().await.context("Server failed")?;
    Ok(())
}

async fn run_synthesize(config: ServerConfig, text: &str, lang: &str, output: Option<PathBuf>) -> Result<()> {
    let state = ServerState::from_config(config).context("Failed to initialize backends")?;

    let start = Instant::now();
    let audio = state.dispatcher.synthesize(text, lang).await?;
    let elapsed = start.elapsed();

    let output = output.unwrap_or_else(|| PathBuf::from(format!("output.{}", audio.mime.extension())));
    std::fs::write(&output, &audio.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Language:  {} ({})", audio.language.profile().name, audio.language);
    println!("Backend:   {}", audio.backend);
    println!("Type:      {}", audio.mime);
    if audio.mime == AudioMime::Wav {
        let info = inspect(&audio.bytes)?;
        println!("Duration:  {:.2}s @ {} Hz", info.duration_secs, info.sample_rate);
    }
    println!("Size:      {} bytes", audio.len());
    println!("Time:      {:.2}s", elapsed.as_secs_f32());
    println!("Saved to:  {}", output.display());
    Ok(())
}

async fn run_detect(config: ServerConfig, text: &str) -> Result<()> {
    let state = ServerState::from_config(config).context("Failed to initialize backends")?;
    let result = state.identifier.detect_language(text).await;
    if let Some(reason) = result.reason.filter(|_| result.is_fallback()) {
        info!("Classifier not used ({}), answering with English", reason);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn print_languages() {
    println!("{:<5} {:<12} {:<6} {:<8} Greetings", "Code", "Name", "Voice", "Cloud");
    println!("{}", "-".repeat(60));
    for language in Language::all() {
        let profile = language.profile();
        let voice = if profile.native_eligible() { profile.voice_id } else { "-" };
        println!(
            "{:<5} {:<12} {:<6} {:<8} {}",
            profile.code(),
            profile.name,
            voice,
            profile.cloud_code.unwrap_or("-"),
            profile.greetings.join(", ")
        );
    }
}

fn run_init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }
    ServerConfig::default()
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote default config to {}", output.display());
    Ok(())
}
