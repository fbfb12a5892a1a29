#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::HtmlExport;
use crate::domain::services::LocalStorage;
use crate::domain::services::SessionState;
use crate::infrastructure::backends::BackendManager;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter: Send the message.
- Shift+Enter: Insert a new line.
- Up/Down, mouse wheel: Scroll the conversation.
- PageUp/PageDown, CTRL+U/CTRL+D: Scroll a page at a time.
- CTRL+N: Start a new session.
- CTRL+R: Reload the conversation from the server.
- ESC: Dismiss the current error.
- CTRL+C: Quit.
"#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_session() -> Result<(SessionState, Option<String>)> {
    let mut state = SessionState::new(LocalStorage::default());
    let pending = state
        .initialize(&Config::get(ConfigKey::SessionID))
        .await?;

    return Ok((state, pending));
}

async fn ask(question: &str) -> Result<()> {
    let content = question.trim();
    if content.is_empty() {
        bail!("The question is empty");
    }

    let api = BackendManager::get()?;
    let (mut state, _) = load_session().await?;
    state.send_message(api.as_ref(), content).await?;

    if let Some(err) = state.error() {
        bail!(err.to_string());
    }

    if let Some(reply) = state.messages().last() {
        println!("{}", reply.content);
    }

    return Ok(());
}

async fn export(output: Option<&String>) -> Result<()> {
    let api = BackendManager::get()?;
    let (mut state, pending) = load_session().await?;
    if let Some(session_id) = pending {
        state.load_history(api.as_ref(), &session_id).await;
    }

    if let Some(err) = state.error() {
        bail!(err.to_string());
    }

    let html = HtmlExport::document(state.session_id(), state.messages());
    match output {
        Some(file_path) => {
            fs::write(file_path, html).await?;
            eprintln!(
                "Exported {} messages to {file_path}",
                state.messages().len()
            );
        }
        None => {
            println!("{html}");
        }
    }

    return Ok(());
}

async fn new_session() -> Result<()> {
    let (mut state, _) = load_session().await?;
    state.create_new_session().await;
    if let Some(err) = state.error() {
        bail!(err.to_string());
    }

    println!("{}", state.session_id());
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_session() -> Command {
    return Command::new("session")
        .about("Inspect or rotate the current session.")
        .subcommand(Command::new("show").about("Print the current session ID, creating one if none is stored."))
        .subcommand(Command::new("new").about("Start a new session and print its ID."));
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Send a single question in the current session and print the reply.")
        .arg(
            Arg::new("question")
                .help("The question to ask.")
                .num_args(1)
                .required(true),
        );
}

fn subcommand_export() -> Command {
    return Command::new("export")
        .about("Export the current session as a standalone HTML transcript.")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("File to write to. Defaults to stdout.")
                .num_args(1),
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("counsel")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_export())
        .subcommand(subcommand_session())
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .short('u')
                .long(ConfigKey::ApiURL.to_string())
                .env("COUNSEL_API_URL")
                .num_args(1)
                .help(format!("Legal assistant API base URL. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("COUNSEL_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long(ConfigKey::HealthCheckTimeout.to_string())
                .env("COUNSEL_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out the API health check. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("COUNSEL_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out chat and history requests. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionID.to_string())
                .long(ConfigKey::SessionID.to_string())
                .env("COUNSEL_SESSION_ID")
                .num_args(1)
                .help("Open this session instead of the stored one. It becomes the stored session.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StorageDir.to_string())
                .long(ConfigKey::StorageDir.to_string())
                .env("COUNSEL_STORAGE_DIR")
                .num_args(1)
                .help(format!("Directory where the current session id is remembered between runs. [default: {}]", Config::default(ConfigKey::StorageDir)))
                .global(true),
        );
}

async fn parse_session(matches: &ArgMatches, subcmd_matches: &ArgMatches) -> Result<()> {
    match subcmd_matches.subcommand() {
        Some(("show", show_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches, show_matches]).await?;
            let (state, _) = load_session().await?;
            println!("{}", state.session_id());
        }
        Some(("new", new_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches, new_matches]).await?;
            new_session().await?;
        }
        _ => {
            subcommand_session().print_long_help()?;
        }
    }

    return Ok(());
}

/// Returns true when the chat UI should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let question = subcmd_matches
                .get_one::<String>("question")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            ask(&question).await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("export", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            export(subcmd_matches.get_one::<String>("output")).await?;
            return Ok(false);
        }
        Some(("session", subcmd_matches)) => {
            parse_session(&matches, subcmd_matches).await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
