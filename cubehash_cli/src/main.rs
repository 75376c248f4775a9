use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use cubehash_core::progress::{NullProvider, ProgressProvider};
use cubehash_core::{
    Clipboard, DigestController, DigestEngine, FileSource, Mode, ResultRecord, decode_text,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use cubehash_cli::clipboard::Osc52Clipboard;
use cubehash_cli::config::{AppConfig, ConfigManager, get_config};
use cubehash_cli::output::{HashReport, OutputFormat, create_formatter};
use cubehash_cli::session::Session;
use cubehash_cli::{progress, server, terminal};

#[derive(Parser)]
#[command(name = "cubehash")]
#[command(author, version, about = "CubeHash digests for files and strings", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-invocation overrides of the configured parameters
#[derive(clap::Args, Debug, Clone)]
struct HashArgs {
    /// CubeHash revision (1, 2 or 3)
    #[arg(short, long)]
    revision: Option<u32>,

    /// Digest length in bits (multiple of 8, at most 512)
    #[arg(short, long)]
    bits: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also copy the digest to the clipboard (OSC 52)
    #[arg(long)]
    copy: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a file
    HashFile {
        /// File to hash
        path: PathBuf,

        #[command(flatten)]
        args: HashArgs,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,
    },

    /// Hash a string (its UTF-8 bytes)
    HashString {
        /// Text to hash
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the text from stdin, byte for byte
        #[arg(long)]
        stdin: bool,

        #[command(flatten)]
        args: HashArgs,
    },

    /// Interactive session with file and string modes
    Session {
        /// CubeHash revision to start with
        #[arg(short, long)]
        revision: Option<u32>,

        /// Digest length in bits to start with
        #[arg(short, long)]
        bits: Option<u32>,
    },

    /// Serve compiled hash artifacts over HTTP
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// Directory holding the cubehash-wasm/ tree
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., hashing.output_bits)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., hashing.output_bits)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("cubehash_core", log::LevelFilter::Debug)
            .filter_module("cubehash_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut config = get_config().context("Failed to load configuration")?;
    if !config.output.color_enabled || !terminal::should_use_color(true) {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::HashFile {
            path,
            args,
            no_progress,
        } => {
            config.apply_cli_overrides(args.revision, args.bits);
            hash_file_command(&config, path, &args, no_progress).await?;
        }
        Commands::HashString { text, stdin, args } => {
            config.apply_cli_overrides(args.revision, args.bits);
            let text = match text {
                Some(text) if !stdin => text,
                _ => read_stdin_text()?,
            };
            hash_string_command(&config, text, &args).await?;
        }
        Commands::Session { revision, bits } => {
            config.apply_cli_overrides(revision, bits);
            session_command(&config).await?;
        }
        Commands::Serve { bind, root } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(root) = root {
                config.server.asset_root = root;
            }
            server::run(&config.server).await?;
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

async fn hash_file_command(
    config: &AppConfig,
    path: PathBuf,
    args: &HashArgs,
    no_progress: bool,
) -> Result<()> {
    config
        .hashing
        .validate()
        .context("Invalid hashing configuration")?;
    let params = config.hashing.parameters();
    let engine = DigestEngine::default();

    let mut source = FileSource::open(&path, config.hashing.chunk_size)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let show_progress =
        !no_progress && config.output.progress_enabled && terminal::should_show_progress_by_default();

    // Create progress infrastructure
    let (provider, progress_handle) = if show_progress {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (provider, rx) = progress::create_progress_infrastructure(name);
        let label = path.display().to_string();
        let handle = tokio::spawn(progress::render_progress(rx, label));
        (provider, Some(handle))
    } else {
        (Arc::new(NullProvider) as Arc<dyn ProgressProvider>, None)
    };

    let outcome = engine
        .compute_file_digest(&mut source, params, provider.as_ref())
        .await;

    // Signal completion so the renderer can exit its loop
    provider.complete();
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }

    let record = outcome.with_context(|| format!("Failed to hash {}", path.display()))?;
    let report = HashReport {
        source: path.display().to_string(),
        mode: Mode::File,
        params,
        record,
    };
    emit(config, &report, args)
}

async fn hash_string_command(config: &AppConfig, text: String, args: &HashArgs) -> Result<()> {
    let params = config.hashing.parameters();
    let engine = DigestEngine::default();

    let digest = tokio::task::spawn_blocking(move || engine.compute_string_digest(&text, params))
        .await
        .context("Hashing task failed")?
        .context("Failed to hash string")?;

    let report = HashReport {
        source: "<string>".to_string(),
        mode: Mode::String,
        params,
        record: ResultRecord::string(digest),
    };
    emit(config, &report, args)
}

fn emit(config: &AppConfig, report: &HashReport, args: &HashArgs) -> Result<()> {
    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_string(&config.output.default_format)?,
    };
    let use_color = terminal::should_use_color(config.output.color_enabled);
    let formatter = create_formatter(format, use_color);

    if let Some(summary) = formatter.format_summary(report) {
        eprintln!("{summary}");
    }
    println!("{}", formatter.format_result(report)?);

    if args.copy {
        // Clipboard failures are not worth failing the command over
        let _ = Osc52Clipboard::stderr().write_text(&report.record.digest.to_hex());
    }

    Ok(())
}

fn read_stdin_text() -> Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    Ok(decode_text(bytes)?)
}

async fn session_command(config: &AppConfig) -> Result<()> {
    config
        .hashing
        .validate()
        .context("Invalid hashing configuration")?;

    let controller = DigestController::new(DigestEngine::default(), config.hashing.parameters());
    let mut session = Session::new(
        controller,
        config.hashing.chunk_size,
        Box::new(Osc52Clipboard::stderr()),
        std::io::stdout(),
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(stdin).await
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:#}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => match manager.list() {
            Ok(items) => {
                eprintln!("{}", "Configuration:".bold().blue());
                eprintln!("Config file: {}", manager.get_config_path().display());
                eprintln!();

                let mut current_section = None;
                for (key, value) in items {
                    let (section, name) = key.split_once('.').unwrap_or(("general", key.as_str()));
                    if current_section.as_deref() != Some(section) {
                        println!("[{}]", section.yellow());
                        current_section = Some(section.to_string());
                    }
                    println!("  {} = {}", name.cyan(), value);
                }
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
