//! sitechat CLI: Command-line interface for the website-builder assistant

use clap::{Parser, Subcommand};
use sitechat_engine::{
    ChatRequest, Config, DialogueError, DialogueService, HttpDialogueClient, UpdateRequest,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Guided website-builder chat in the terminal
#[derive(Parser)]
#[command(name = "sitechat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialogue Service base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Create the config file with a fresh session id
    Init,

    /// Send one chat message and print the reply
    Send {
        /// Message text
        message: String,

        /// Step the message answers
        #[arg(long, default_value = "1")]
        step: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a website update instruction and print the reply
    Update {
        /// Instruction text
        instruction: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

const DEFAULT_CONFIG_PATH: &str = ".sitechat/config.json";
const LOG_FILE: &str = "sitechat.log";

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging(&cli.config);
            let config = load_config(&cli.config, cli.server.as_deref());
            let service = connect(&config);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(sitechat_tui::run_tui(config, service)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Init) => {
            init_stderr_logging();
            cmd_init(&cli.config, cli.server.as_deref());
        }
        Some(Commands::Send {
            message,
            step,
            json,
        }) => {
            init_stderr_logging();
            let config = load_config(&cli.config, cli.server.as_deref());
            cmd_send(&config, message, step, json);
        }
        Some(Commands::Update { instruction, json }) => {
            init_stderr_logging();
            let config = load_config(&cli.config, cli.server.as_deref());
            cmd_update(&config, instruction, json);
        }
    }
}

/// `SITECHAT_LOG` takes precedence over `RUST_LOG`; default is `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("SITECHAT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log to a file next to the config while the TUI owns the terminal.
fn init_file_logging(config_path: &Path) {
    let dir = config_dir(config_path);
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create {}: {e}", dir.display());
        std::process::exit(1);
    }
    let log_path = dir.join(LOG_FILE);
    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", log_path.display());
            std::process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn config_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn load_config(path: &Path, server: Option<&str>) -> Config {
    let config = match Config::load_or_init(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match server {
        Some(url) => config.with_server_url(url),
        None => config,
    }
}

fn connect(config: &Config) -> Arc<dyn DialogueService> {
    match HttpDialogueClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn exit_with(err: &DialogueError) -> ! {
    eprintln!("Error: {err}");
    if let Some(message) = err.service_message() {
        eprintln!("{message}");
    }
    std::process::exit(1);
}

fn cmd_init(config_path: &Path, server: Option<&str>) {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    let config = match server {
        Some(url) => Config::default().with_server_url(url),
        None => Config::default(),
    };

    match config.save(config_path) {
        Ok(()) => {
            info!(path = %config_path.display(), "created config");
            println!("Created {}", config_path.display());
            println!("Session id: {}", config.user_id);
            println!("Server: {}", config.server_url);
        }
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_send(config: &Config, message: String, step: u32, json: bool) {
    let service = connect(config);
    let request = ChatRequest {
        message,
        user_id: config.user_id.clone(),
        step,
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let reply = match rt.block_on(service.chat(request)) {
        Ok(reply) => reply,
        Err(e) => exit_with(&e),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reply).expect("failed to serialize")
        );
        return;
    }

    println!("{}", reply.message);
    if let Some(ref suggestions) = reply.suggestions {
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("  {}. {suggestion}", i + 1);
        }
    }
    if let Some(step) = reply.next_step {
        println!("\nNext step: {step}");
    }
    if reply.is_site_generated() {
        if let Some(ref link) = reply.link {
            println!("Website: {link}");
        }
    }
}

fn cmd_update(config: &Config, instruction: String, json: bool) {
    let service = connect(config);
    let request = UpdateRequest { instruction };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let reply = match rt.block_on(service.update_website(request)) {
        Ok(reply) => reply,
        Err(e) => exit_with(&e),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reply).expect("failed to serialize")
        );
    } else {
        println!("{}", reply.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::try_parse_from(["sitechat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_send_parses_step_and_global_server() {
        let cli = Cli::try_parse_from([
            "sitechat",
            "send",
            "Blog",
            "--step",
            "2",
            "--server",
            "http://example.test",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://example.test"));
        match cli.command {
            Some(Commands::Send {
                message,
                step,
                json,
            }) => {
                assert_eq!(message, "Blog");
                assert_eq!(step, 2);
                assert!(!json);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_config_dir_of_bare_file_is_cwd() {
        assert_eq!(config_dir(Path::new("config.json")), Path::new("."));
        assert_eq!(
            config_dir(Path::new(".sitechat/config.json")),
            Path::new(".sitechat")
        );
    }

    #[test]
    fn test_load_config_keeps_session_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".sitechat").join("config.json");

        let first = load_config(&path, None);
        let second = load_config(&path, Some("http://example.test"));

        assert!(path.exists());
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.server_url, "http://example.test");
        // The override is not written back.
        assert_eq!(Config::load(&path).unwrap().server_url, first.server_url);
    }
}
