use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geminidesk::connector::tui;
use geminidesk::{Commands, Container, ContainerConfig, GeminiClient, Router};

const LOG_FILE_NAME: &str = "geminidesk.log";

#[derive(Parser)]
#[command(name = "geminidesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.geminidesk")]
    data_dir: String,

    /// Model name [env: GEMINI_MODEL, default: gemini-pro]
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL [env: GEMINI_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Keep the API key in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.no_persist {
        std::fs::create_dir_all(&data_dir)?;
    }

    let command = cli.command.unwrap_or(Commands::Chat);
    let is_chat = matches!(command, Commands::Chat);

    let rust_log = std::env::var("RUST_LOG").ok();
    init_logging(
        log_filter(cli.verbose, rust_log.as_deref()),
        log_target(is_chat, cli.no_persist, &data_dir),
    )?;

    let config = ContainerConfig {
        data_dir: data_dir.clone(),
        model: cli.model.unwrap_or_else(GeminiClient::model_from_env),
        base_url: cli.base_url.unwrap_or_else(GeminiClient::base_url_from_env),
        no_persist: cli.no_persist,
        env_api_key: std::env::var("GEMINI_API_KEY").ok(),
    };
    debug!("Data dir: {}, model: {}", config.data_dir, config.model);

    let container = Container::new(config)?;

    if is_chat {
        return tui::run(&container).await;
    }

    let router = Router::new(&container);
    let output = router.route(command).await?;
    println!("{}", output);

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

/// The chat window owns the terminal, so its logs go to a file in the data
/// dir, or nowhere when nothing may be written to disk.
fn log_target(is_chat: bool, no_persist: bool, data_dir: &str) -> LogTarget {
    match (is_chat, no_persist) {
        (false, _) => LogTarget::Stderr,
        (true, false) => LogTarget::File(Path::new(data_dir).join(LOG_FILE_NAME)),
        (true, true) => LogTarget::Off,
    }
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, defaulting to info.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_logging(filter: EnvFilter, target: LogTarget) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Off => {}
    }
    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_chat() {
        let cli = Cli::try_parse_from(["geminidesk"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, "~/.geminidesk");
    }

    #[test]
    fn ask_takes_a_prompt() {
        let cli = Cli::try_parse_from(["geminidesk", "ask", "hello there"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Ask { ref prompt }) if prompt == "hello there"));
    }

    #[test]
    fn set_key_accepts_optional_key() {
        let cli = Cli::try_parse_from(["geminidesk", "set-key"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::SetKey { key: None })));

        let cli = Cli::try_parse_from(["geminidesk", "--no-persist", "set-key", "k"]).unwrap();
        assert!(cli.no_persist);
        assert!(matches!(cli.command, Some(Commands::SetKey { key: Some(ref k) }) if k == "k"));
    }

    #[test]
    fn chat_logs_to_file_unless_no_persist() {
        assert_eq!(
            log_target(true, false, "/data"),
            LogTarget::File(PathBuf::from("/data").join(LOG_FILE_NAME))
        );
        assert_eq!(log_target(true, true, "/data"), LogTarget::Off);
        assert_eq!(log_target(false, true, "/data"), LogTarget::Stderr);
        assert_eq!(log_target(false, false, "/data"), LogTarget::Stderr);
    }

    #[test]
    fn verbose_overrides_rust_log() {
        assert_eq!(log_filter(true, Some("warn")).to_string(), "debug");
        assert_eq!(log_filter(false, Some("warn")).to_string(), "warn");
        assert_eq!(log_filter(false, None).to_string(), "info");
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/tmp/x"), "/tmp/x");
    }
}
