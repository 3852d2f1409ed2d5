//! # Seed Vault CLI (`vault`)
//!
//! Reads the seed pages named in the configuration file and exposes the
//! artifact listing, the duplicate check, the name lookup, and inline word
//! tagging from the command line.
//!
//! ## Usage
//!
//! ```bash
//! vault --config ./config/vault.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vault artifacts` | List displayable artifacts from the artifact page |
//! | `vault check` | Fail if any (title, author, date) row repeats |
//! | `vault find <category> <name>` | Look up a language, artifact, or location |
//! | `vault tag "<text>"` | Annotate free text with word tags |
//! | `vault can <role> <action>` | Check the role permission table |
//! | `vault login <user>` | Check a password (read from stdin) |
//! | `vault upload-check <file> --mime <type>` | Validate a file for upload |
//!
//! ## Examples
//!
//! ```bash
//! vault find language Navajo
//! vault find location true --json     # rejected: not text
//! vault tag "We plant the seed." --tag seed=noun --tag plant=verb
//! vault can tribe1 view --level tribe2      # denied
//! vault upload-check ./recording.mp3 --mime audio/mpeg --role tribe1
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use seed_vault::config::{self, LoggingConfig};
use seed_vault::models::Category;
use seed_vault::roles::{self, AccessLevel, Action, Role};
use seed_vault::{listing, logging, lookup, tagging, upload};

/// Seed Vault CLI: artifact listing, name lookup, and word tagging for
/// the Seed Vault site.
#[derive(Parser)]
#[command(name = "vault", version, about = "Seed Vault: artifact listing, name lookup, and word tagging")]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/vault.toml`. Seed page paths, lookup table ids,
    /// and the log filter are read from this file.
    #[arg(long, global = true, default_value = "./config/vault.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List artifacts from the artifact page.
    ///
    /// Prints every displayable row, or `no artifacts available` when the
    /// page has none, followed by rows rejected for missing data.
    Artifacts,

    /// Check that no (title, author, date) triple repeats.
    Check,

    /// Look up a name in one of the lookup tables.
    Find {
        /// Table to search.
        #[arg(value_enum)]
        category: Category,

        /// Name to look up (exact, case-sensitive).
        name: String,

        /// Parse NAME as a JSON literal instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Annotate free text with word tags. Does not read the config file.
    Tag {
        /// Text to tag.
        text: String,

        /// Tags as `word=tag` pairs.
        #[arg(long = "tag", value_parser = parse_key_val)]
        tags: Vec<(String, String)>,

        /// Render highlight markup instead of plain annotations.
        #[arg(long)]
        highlight: bool,
    },

    /// Check whether a role may perform an action. Does not read the config file.
    Can {
        #[arg(value_enum)]
        role: Role,

        #[arg(value_enum)]
        action: Action,

        /// Access level of the material acted on.
        #[arg(long, value_enum)]
        level: Option<AccessLevel>,
    },

    /// Check a password against the configured users.
    ///
    /// The password is read from the first line of stdin.
    Login {
        username: String,
    },

    /// Validate a file against the upload rules.
    UploadCheck {
        /// File to check.
        file: PathBuf,

        /// Declared MIME type.
        #[arg(long)]
        mime: String,

        /// Role of the uploader.
        #[arg(long, value_enum, default_value = "guest")]
        role: Role,
    },
}

/// Parse a `key=value` pair for `--tag` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Tag {
        text,
        tags,
        highlight,
    } = cli.command
    {
        logging::init(&LoggingConfig::default())?;
        return tagging::run_tag(&text, tags, highlight);
    }
    if let Commands::Can {
        role,
        action,
        level,
    } = cli.command
    {
        logging::init(&LoggingConfig::default())?;
        return roles::run_can(role, action, level);
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging)?;

    match cli.command {
        Commands::Artifacts => listing::run_artifacts(&cfg)?,
        Commands::Check => listing::run_check(&cfg)?,
        Commands::Find {
            category,
            name,
            json,
        } => lookup::run_find(&cfg, category, &name, json)?,
        Commands::Login { username } => roles::run_login(&cfg.users, &username)?,
        Commands::UploadCheck { file, mime, role } => {
            upload::run_upload_check(&cfg, &file, &mime, role)?
        }
        Commands::Tag { .. } | Commands::Can { .. } => {
            unreachable!("handled before config loading")
        }
    }

    Ok(())
}
