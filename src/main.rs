mod app;
mod backend;
mod command;
mod config;
mod constants;
mod credentials;
mod mail;
mod repl;
mod session;

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{Assistant, Interpreter};
use crate::backend::HttpBackend;
use crate::config::Config;
use crate::credentials::TokenStore;
use crate::session::Session;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mailchat=debug"));

    // stdout carries the transcript, so logs go to a file when possible
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("mailchat.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"mailchat - Drive your mailbox from a chat prompt

Usage: mailchat [command]

Commands:
    (none)                               Start an interactive chat session
    setup                                Configure the service URL and auth token
    script <file> [--transcript <json>]  Run chat commands from a file
    logout                               Forget the stored auth token
    help                                 Show this help message

In chat: "show emails", "summarize [#]", "reply [#]", "send", "delete [#]",
and "logout" or "quit" to leave.

Configuration file: ~/.config/mailchat/config.toml
"#
    );
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn run_setup() -> Result<()> {
    println!("Mailchat Setup");
    println!("==============\n");

    let mut config = Config::load()?;

    let url = loop {
        let url = prompt(&format!("Service URL [{}]: ", config.backend.url))?;
        if url.is_empty() {
            break config.backend.url.clone();
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            break url.trim_end_matches('/').to_string();
        }
        println!("Invalid URL. It must start with http:// or https://");
    };
    config.backend.url = url;

    let backend = HttpBackend::from_config(&config.backend)?;
    println!(
        "\nSign in at {} and paste the token from the redirect URL.",
        backend.login_url()
    );
    let token = prompt("Token: ")?;

    config.save()?;
    println!("Configuration saved to {}", Config::config_path()?.display());

    TokenStore::new(&config.backend.url).set_token(&token)?;
    println!("Token stored.");

    println!("\nSetup complete! Run 'mailchat' to start.");
    Ok(())
}

/// Build the assistant for the configured service and stored token
fn connect(config: &Config) -> Result<(Assistant<HttpBackend>, String)> {
    let token = TokenStore::new(&config.backend.url).get_token()?;
    let backend = HttpBackend::from_config(&config.backend)?;
    tracing::info!("Using service at {}", backend.base_url());

    let interpreter = Interpreter::new(backend).with_progress(config.chat.show_progress);
    Ok((Assistant::new(interpreter, Session::new(token.clone())), token))
}

async fn run_chat(config: &Config) -> Result<()> {
    let (assistant, token) = connect(config)?;

    if config.chat.greeting {
        let profile = match assistant.interpreter().backend().profile(&token).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Could not fetch profile: {}", e);
                None
            }
        };
        assistant
            .greet(profile.as_ref().and_then(|p| p.display()))
            .await;
    }

    match repl::run_interactive(&assistant).await? {
        repl::Exit::Quit => {}
        repl::Exit::Logout => {
            TokenStore::new(&config.backend.url).delete_token()?;
            println!("Logged out.");
        }
    }
    Ok(())
}

async fn run_script(config: &Config, args: &[String]) -> Result<()> {
    let (path, transcript_out) = match args {
        [path] => (PathBuf::from(path), None),
        [path, flag, out] if flag == "--transcript" => {
            (PathBuf::from(path), Some(PathBuf::from(out)))
        }
        _ => {
            print_usage();
            anyhow::bail!("Usage: mailchat script <file> [--transcript <json>]");
        }
    };

    let script = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    let (assistant, _) = connect(config)?;
    let submitted = repl::run_script(&assistant, &script).await?;
    tracing::info!("Script ran {} commands", submitted);

    println!("{}", repl::transcript_text(&assistant).await);
    if let Some(out) = transcript_out {
        repl::write_transcript_json(&assistant, &out).await?;
        eprintln!("Transcript written to {}", out.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some("logout") => {
            let config = Config::load()?;
            TokenStore::new(&config.backend.url).delete_token()?;
            println!("Stored token removed.");
            Ok(())
        }
        Some("script") => {
            setup_logging();
            let config = Config::load()?;
            run_script(&config, &args[2..]).await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            config.ensure_dirs()?;
            run_chat(&config).await
        }
    }
}
