// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// camli-prefs — inspect and edit the Camlistore uploader preferences.
//
// Entry point. Initialises logging, parses the command line, selects the
// preference provider, and dispatches to the command handlers.

mod commands;
mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use services::provider::Provider;

#[derive(Parser)]
#[command(name = "camli-prefs")]
#[command(about = "Camlistore uploader preferences")]
#[command(version)]
struct Cli {
    /// Directory holding one JSON file per preference store
    #[arg(long, global = true, value_name = "DIR")]
    prefs_dir: Option<PathBuf>,

    /// SQLite database holding every preference store
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "prefs_dir")]
    sqlite: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved uploader configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every setting with its type, default and description
    Keys,
    /// Print one setting (stored value or its default)
    Get {
        /// Preference key, e.g. camli.host
        key: String,
    },
    /// Store one setting
    Set {
        /// Preference key, e.g. camli.auto
        key: String,
        /// New value; booleans accept true/false, 1/0, yes/no, on/off
        value: String,
    },
    /// Remove one setting so its default applies again
    Unset {
        /// Preference key
        key: String,
    },
    /// Point the uploader at a development server
    DevIp {
        /// Server IP address
        #[arg(required_unless_present = "clear")]
        ip: Option<String>,
        /// Leave development mode
        #[arg(long, conflicts_with = "ip")]
        clear: bool,
    },
    /// Manage extra backup directories
    BackupDirs {
        #[command(subcommand)]
        action: BackupDirCommands,
    },
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum BackupDirCommands {
    /// List backup directories
    List,
    /// Add a backup directory
    Add {
        /// Directory path
        dir: String,
    },
    /// Remove a backup directory
    Remove {
        /// Directory path
        dir: String,
    },
    /// Remove every backup directory
    Clear,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List all profiles
    List,
    /// Print the selected profile
    Current,
    /// Select a profile, creating it if needed
    Use {
        /// Profile name
        name: String,
    },
    /// Register a profile without selecting it
    Add {
        /// Profile name
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let provider = Provider::select(cli.prefs_dir, cli.sqlite)?;
    tracing::debug!(location = %provider.location(), "camli-prefs starting");

    match cli.command {
        Commands::Show { json } => commands::show(&provider, json),
        Commands::Keys => commands::list_keys(),
        Commands::Get { key } => commands::get(&provider, &key),
        Commands::Set { key, value } => commands::set(&provider, &key, &value),
        Commands::Unset { key } => commands::unset(&provider, &key),
        Commands::DevIp { ip, clear } => {
            let ip = if clear { None } else { ip };
            commands::dev_ip(&provider, ip.as_deref())
        }
        Commands::BackupDirs { action } => match action {
            BackupDirCommands::List => commands::backup_dirs_list(&provider),
            BackupDirCommands::Add { dir } => commands::backup_dirs_add(&provider, &dir),
            BackupDirCommands::Remove { dir } => commands::backup_dirs_remove(&provider, &dir),
            BackupDirCommands::Clear => commands::backup_dirs_clear(&provider),
        },
        Commands::Profile { action } => match action {
            ProfileCommands::List => commands::profile_list(&provider),
            ProfileCommands::Current => commands::profile_current(&provider),
            ProfileCommands::Use { name } => commands::profile_use(&provider, &name),
            ProfileCommands::Add { name } => commands::profile_add(&provider, &name),
        },
    }
}
