use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use sharelink::browser::{Browser, Outcome};
use sharelink::commands::Command;
use sharelink::config::{format_config, Config};
use sharelink::listing::Entry;
use sharelink::logging::{init_logging, LogConfig, Verbosity};
use sharelink::share::expiration::{self, EXPIRATION_PRESETS};
use sharelink::share::{compile, make_template_data, placeholders, HttpShareClient, ShareInfo};
use tracing::warn;

#[derive(Parser)]
#[command(name = "sharelink")]
#[command(version)]
#[command(about = "Create time-limited, password-protected share links")]
#[command(
    long_about = "Select entries of a directory and turn them into a share link on a file-manager share service, rendering the result through a configurable message template."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write debug logs to this file
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an expiration token (2H, +2d, 1w, 1M, never) to a timestamp
    Expires {
        /// The duration token
        token: String,
    },
    /// Render a message template
    Render {
        /// Template text with {{key}} placeholders
        #[arg(short, long)]
        template: String,

        /// Context value as key=value (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// JSON object file used as context
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Share entries of a directory
    Share {
        /// Directory the entries live in, relative to the base path
        #[arg(short = 'C', long, default_value = "/")]
        dir: String,

        /// Entry names to share
        #[arg(required = true)]
        names: Vec<String>,

        /// Base path prefixed to every shared path
        #[arg(long)]
        base_path: Option<String>,

        /// Expiration token (defaults to the configured token)
        #[arg(short, long)]
        expires: Option<String>,

        /// Password (defaults to a random one)
        #[arg(short, long)]
        password: Option<String>,

        /// Maximum number of accesses (0 is unlimited)
        #[arg(short, long, default_value = "0")]
        max_accessed: u32,

        /// Readme shown on the share page
        #[arg(long)]
        readme: Option<String>,

        /// Private remark
        #[arg(long)]
        remark: Option<String>,

        /// Share service URL
        #[arg(long)]
        server: Option<String>,

        /// Copy the resulting message to the clipboard
        #[arg(long)]
        copy: bool,

        /// Pick the expiration interactively
        #[arg(short, long)]
        interactive: bool,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set {
        /// One of the keys listed by `config show`
        key: String,
        value: String,
    },
    /// Clear a configuration value
    Unset { key: String },
}

/// Parse `key=value` pairs into template overrides.
fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .with_context(|| format!("Expected KEY=VALUE, got '{}'", pair))
        })
        .collect()
}

/// Ask for an expiration from the preset menu, or a custom token.
fn prompt_expiration(default: &str) -> Result<String> {
    const CUSTOM: &str = "custom...";

    let mut options: Vec<String> = EXPIRATION_PRESETS
        .iter()
        .map(|(token, label)| format!("{} ({})", token, label))
        .collect();
    options.push(CUSTOM.to_string());
    let start = EXPIRATION_PRESETS
        .iter()
        .position(|(token, _)| *token == default)
        .unwrap_or(0);

    let choice = inquire::Select::new("Expires in:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Expiration prompt cancelled")?;

    if choice == CUSTOM {
        let token = inquire::Text::new("Duration token (e.g. +3d, 6H, 2M, never):")
            .with_validator(|input: &str| {
                if expiration::is_valid(input) {
                    Ok(inquire::validator::Validation::Valid)
                } else {
                    Ok(inquire::validator::Validation::Invalid(
                        "expected never or [+]<n><H|d|w|M>".into(),
                    ))
                }
            })
            .prompt()
            .context("Expiration prompt cancelled")?;
        return Ok(token);
    }

    Ok(choice
        .split_whitespace()
        .next()
        .unwrap_or(default)
        .to_string())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&LogConfig {
        verbosity: Verbosity::from_count(cli.verbose),
        log_file: cli.log_file.clone(),
    });

    match cli.command {
        Commands::Expires { token } => match expiration::resolve_now(&token)? {
            Some(at) => println!("{}", at.to_rfc3339()),
            None => println!("never"),
        },
        Commands::Render {
            template,
            set,
            data,
        } => {
            let info = match data {
                Some(path) => {
                    let contents = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let value: serde_json::Value = serde_json::from_str(&contents)
                        .with_context(|| format!("Failed to parse {}", path.display()))?;
                    ShareInfo::from_value(value)?
                }
                None => ShareInfo::default(),
            };
            let context = make_template_data(&info, parse_pairs(&set)?);
            for key in placeholders(&template) {
                if !context.contains_key(&key) {
                    warn!(key = %key, "Placeholder has no value and renders empty");
                }
            }
            println!("{}", compile(&template, &context));
        }
        Commands::Share {
            dir,
            names,
            base_path,
            expires,
            password,
            max_accessed,
            readme,
            remark,
            server,
            copy,
            interactive,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let settings = config.share_settings();
            let default_expiration = settings.default_expiration.clone();

            // Only names matter for the share; sizes and times are not sent.
            let now = Utc::now();
            let entries = names.iter().map(|n| Entry::file(n, 0, now)).collect();

            let mut browser = Browser::new(
                config.effective_base_path(base_path.as_deref()),
                settings,
            );
            browser.navigate(dir, entries);
            browser.selection_mut().select_all();

            let Outcome::OpenShare(mut builder) = browser.apply(Command::Share) else {
                anyhow::bail!("Nothing selected to share");
            };

            let token = match expires {
                Some(token) => token,
                None if interactive => prompt_expiration(&default_expiration)?,
                None => default_expiration,
            };
            builder.set_expiration(token)?;
            if let Some(password) = password {
                builder.set_password(password);
            }
            builder.set_max_accessed(max_accessed);
            if let Some(readme) = readme {
                builder.set_readme(readme);
            }
            if let Some(remark) = remark {
                builder.set_remark(remark);
            }

            let client = HttpShareClient::new(config.effective_server_url(server.as_deref()))
                .with_token(config.token.clone());
            let message = builder.submit(&client).await?;

            println!("{}", message);
            if copy {
                copy_to_clipboard(&message)?;
                eprintln!("Copied to clipboard");
            }
        }
        Commands::Config { action } => {
            let mut config = Config::load().context("Failed to load configuration")?;
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    println!("{}", format_config(&config));
                    if let Ok(path) = Config::config_path() {
                        println!();
                        if config.is_empty() {
                            println!("No config file values set ({})", path.display());
                        } else {
                            println!("Config file: {}", path.display());
                        }
                    }
                }
                ConfigAction::Set { key, value } => {
                    config.set(&key, Some(value.as_str()))?;
                    config.save().context("Failed to save configuration")?;
                    println!("Set {}", key);
                }
                ConfigAction::Unset { key } => {
                    config.set(&key, None)?;
                    config.save().context("Failed to save configuration")?;
                    println!("Cleared {}", key);
                }
            }
        }
    }

    Ok(())
}
