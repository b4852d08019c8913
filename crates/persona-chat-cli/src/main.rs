//! Persona Chat CLI - Terminal client for the persona chat relay
//!
//! Chat with the Friend, Lover or Assistant persona, optionally by voice.

mod api;
mod chat;
mod config;
mod selector;
mod session;
mod voice;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use api::ChatApiClient;
use chat::ChatController;
use config::Config;
use selector::{paint, PersonaSelector};
use session::ChatSession;
use voice::{CommandRecognizer, CommandSynthesizer, Voice};

#[derive(Parser)]
#[command(name = "persona-chat")]
#[command(about = "Persona Chat CLI - Talk to an AI persona", long_about = None)]
#[command(version)]
struct Cli {
    /// Relay server URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation (default)
    Chat {
        /// Persona to start with (friend, lover, assistant)
        #[arg(short, long)]
        mode: Option<String>,
        /// Speak replies aloud
        #[arg(long)]
        speak: bool,
    },

    /// Send a single message and print the reply
    Say {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
        /// Persona to use
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// List available personas
    Personas,

    /// Check that the relay server is reachable
    Health,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a value (base-url, default-mode, speak, tts-command, stt-command)
    Set {
        /// Setting name
        key: String,
        /// New value (empty string clears a command)
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command.unwrap_or(Commands::Chat {
        mode: None,
        speak: false,
    }) {
        Commands::Chat { mode, speak } => cmd_chat(config, mode, speak).await,
        Commands::Say { message, mode } => cmd_say(config, message.join(" "), mode).await,
        Commands::Personas => cmd_personas(config).await,
        Commands::Health => cmd_health(config).await,
        Commands::Config { action } => cmd_config(config, action.unwrap_or(ConfigAction::Show)),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_chat(config: Config, mode: Option<String>, speak: bool) -> Result<()> {
    let client = ChatApiClient::new(&config.base_url);

    let personas = match client.list_personas().await {
        Ok(personas) => personas,
        Err(e) => {
            println!("{} Could not load personas: {:#}", "!".yellow(), e);
            Vec::new()
        }
    };

    let mut session = ChatSession::new(mode.unwrap_or(config.default_mode));
    let speaker = CommandSynthesizer::from_config(config.tts_command.as_deref());
    if (speak || config.speak) && !speaker.is_available() {
        println!(
            "{} Spoken replies need a speech command: persona-chat config set tts-command <cmd>",
            "!".yellow()
        );
    }
    session.set_speak_replies((speak || config.speak) && speaker.is_available());

    let mut controller = ChatController::new(
        client,
        session,
        speaker,
        CommandRecognizer::from_config(config.stt_command.as_deref()),
    );
    let mut selector = PersonaSelector::new(personas);

    chat::run(&mut controller, &mut selector).await
}

async fn cmd_say(config: Config, message: String, mode: Option<String>) -> Result<()> {
    let client = ChatApiClient::new(&config.base_url);
    let mut session = ChatSession::new(mode.unwrap_or(config.default_mode));
    session.set_draft(message);

    let mut controller: ChatController<_, CommandSynthesizer, CommandRecognizer> =
        ChatController::new(client, session, Voice::Unavailable, Voice::Unavailable);

    let Some(turn) = controller.submit().await else {
        bail!("Message is empty");
    };

    if turn.failed {
        bail!("{}", failure_reason(&turn.text));
    }

    println!("{}", turn.text);
    Ok(())
}

/// Error turn text without its "Error: " lead, which anyhow's report adds back
fn failure_reason(text: &str) -> &str {
    text.strip_prefix("Error: ").unwrap_or(text)
}

async fn cmd_personas(config: Config) -> Result<()> {
    let client = ChatApiClient::new(&config.base_url);
    let personas = client.list_personas().await?;

    if personas.is_empty() {
        println!("No personas available.");
        return Ok(());
    }

    println!("{}", "Personas:".bold());
    for persona in personas {
        let default_marker = if persona.id == config.default_mode {
            " (default)".green().to_string()
        } else {
            String::new()
        };

        println!(
            "  {} {} {}{}",
            persona.id.dimmed(),
            paint(&persona.name, &persona.theme).bold(),
            persona.tagline.dimmed(),
            default_marker
        );
    }

    Ok(())
}

async fn cmd_health(config: Config) -> Result<()> {
    let client = ChatApiClient::new(&config.base_url);
    print!("Testing connection to {}... ", config.base_url);

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
            Ok(())
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Persona Chat API at {}", config.base_url);
        }
    }
}

fn cmd_config(mut config: Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);
            println!("  Default Mode: {}", config.default_mode.cyan());
            println!(
                "  Speak Replies: {}",
                if config.speak { "On".green() } else { "Off".dimmed() }
            );
            println!(
                "  TTS Command: {}",
                config.tts_command.as_deref().unwrap_or("Not set")
            );
            println!(
                "  STT Command: {}",
                config.stt_command.as_deref().unwrap_or("Not set")
            );
        }

        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} {} updated", "✓".green(), key.cyan());
        }
    }

    Ok(())
}
