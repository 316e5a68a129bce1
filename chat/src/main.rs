//! @ai:module:intent CLI for the Lexeval translation-evaluation chat
//! @ai:module:layer presentation

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lexeval_chat::{
    client::{LlmClientTrait, MockLlmClient, OpenAiClient},
    config::AppConfig,
    models::{models_table, GptModel},
    session::Session,
};
use lexeval_mqm::{strict_schema, Scenario};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexeval")]
#[command(about = "Interactive MQM evaluation chat for Greek/German legal translations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Model to use (gpt-4.1, gpt-4o-default, gpt-4o-latest)
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature between 0 and 1
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Request structured MQM annotations instead of free text
        #[arg(long)]
        structured: bool,

        /// Evaluation scenario for structured mode (S-T, R-T, S-R-T)
        #[arg(long)]
        scenario: Option<String>,

        /// Run against a canned response instead of the API
        #[arg(long)]
        mock: bool,
    },

    /// Show the supported models and their costs
    Models,

    /// Print the compiled strict annotation schema
    Schema,

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "lexeval.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexeval_chat=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            config,
            model,
            temperature,
            structured,
            scenario,
            mock,
        } => {
            run_chat_command(ChatArgs {
                config,
                model,
                temperature,
                structured,
                scenario,
                mock,
            })
            .await
        }
        Commands::Models => {
            print!("{}", models_table());
            Ok(())
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(strict_schema())?);
            Ok(())
        }
        Commands::Init { output } => init_config(output),
    }
}

struct ChatArgs {
    config: Option<PathBuf>,
    model: Option<String>,
    temperature: Option<f32>,
    structured: bool,
    scenario: Option<String>,
    mock: bool,
}

/// @ai:intent Resolve options and start the interactive loop
/// @ai:effects network, fs:read
async fn run_chat_command(args: ChatArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(name) = args.model {
        config.api.model = GptModel::parse(&name)
            .ok_or_else(|| anyhow!("unknown model: {name} (see `lexeval models`)"))?;
    }
    if let Some(temperature) = args.temperature {
        config.api.temperature = temperature;
    }

    let mut session = Session::new();
    tracing::debug!(session = %session.id(), "session started");

    if args.structured {
        let scenario = match args.scenario {
            Some(tag) => tag.parse::<Scenario>()?,
            None => Scenario::SourceTarget,
        };
        session.enable_structured(scenario);
        fill_placeholders(&mut session)?;
    }

    if args.mock {
        run_chat(MockLlmClient::with_sample_annotation(), session, config).await
    } else {
        let client = OpenAiClient::new(config.api.clone())?;
        run_chat(client, session, config).await
    }
}

/// @ai:intent Interactive read-eval loop over stdin
///
/// Turns are processed strictly sequentially; a submitted call runs to
/// completion or to failure before the next line is read.
/// @ai:effects network, fs:write
async fn run_chat<C: LlmClientTrait>(client: C, mut session: Session, config: AppConfig) -> Result<()> {
    println!(
        "{}",
        "Commands: :export, :fill, :reset, :quit".dimmed()
    );

    let stdin = std::io::stdin();
    loop {
        print!("{} ", "you>".cyan().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ":quit" | ":q" => break,
            ":reset" => {
                session.reset();
                println!("{}", "Session cleared.".dimmed());
                continue;
            }
            ":fill" => {
                if let Err(e) = fill_placeholders(&mut session) {
                    eprintln!("{} {e:#}", "error:".red().bold());
                }
                continue;
            }
            ":export" => {
                match export_to_file(&session, &config) {
                    Ok(path) => println!("Exported to {}", path.display().to_string().bold()),
                    Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
                }
                continue;
            }
            _ => {}
        }

        match session.submit_turn(&client, &config.api, line).await {
            Ok(reply) => print_reply(&session, &reply),
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
    }

    print_cost_summary(&session, &config);
    Ok(())
}

/// @ai:intent Prompt for a value for every placeholder of the current template
/// @ai:effects state:write
fn fill_placeholders(session: &mut Session) -> Result<()> {
    let names: Vec<String> = session.placeholders.names().map(str::to_string).collect();
    if names.is_empty() {
        return Ok(());
    }

    println!("{}", "Fill in the system prompt placeholders:".bold());
    let stdin = std::io::stdin();
    for name in names {
        print!("  {}: ", name.cyan());
        std::io::stdout().flush()?;

        let mut value = String::new();
        stdin.read_line(&mut value)?;
        session.placeholders.set(&name, value.trim());
    }

    let remaining = session.placeholders.empty_count();
    if remaining > 0 {
        tracing::warn!("{} placeholder value(s) still empty; use :fill to complete them", remaining);
    }
    Ok(())
}

/// @ai:intent Render a model reply, pretty-printing structured annotations
fn print_reply(session: &Session, reply: &str) {
    if session.structured_output() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(reply) {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_default();
            println!("{}\n{pretty}", "assistant>".green().bold());
            return;
        }
    }
    println!("{} {reply}", "assistant>".green().bold());
}

/// @ai:intent Write the session's export artifact under the export directory
/// @ai:effects fs:write
fn export_to_file(session: &Session, config: &AppConfig) -> Result<PathBuf> {
    let artifact = session.export()?;

    std::fs::create_dir_all(&config.export.dir)?;
    let filename = format!(
        "conversation_{}.{}",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"),
        artifact.file_type
    );
    let path = config.export.dir.join(filename);
    std::fs::write(&path, &artifact.bytes)?;
    Ok(path)
}

/// @ai:intent Print accumulated token usage and cost for the session
fn print_cost_summary(session: &Session, config: &AppConfig) {
    let conversation = &session.conversation;
    if conversation.input_tokens() == 0 && conversation.output_tokens() == 0 {
        return;
    }

    println!(
        "{} {} input (${:.4}), {} output (${:.4})",
        "tokens:".dimmed(),
        conversation.input_tokens(),
        conversation.input_cost(config.api.model),
        conversation.output_tokens(),
        conversation.output_cost(config.api.model),
    );
}

/// @ai:intent Write a default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    AppConfig::default().save(&output)?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}

/// @ai:intent Load the given config file, or fall back to defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(&path),
        None => Ok(AppConfig::default()),
    }
}
