//! Command-line front end for the fintrack core.
//!
//! # Responsibility
//! - Wire `fintrack_core` services to the durable SQLite store.
//! - Expose backup/restore and theme preferences without a browser UI.

use clap::{Parser, Subcommand};
use fintrack_core::db::open_db;
use fintrack_core::{
    core_version, init_logging, initialize_default_data, BackupService, ColorPalette, CoreConfig,
    FixedHost, PreferenceService, SqliteStore, StyleSheet, PALETTE_FIELDS,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fintrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Backup, restore and theme preferences for the finance tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: <data dir>/fintrack/fintrack.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Treat the host as preferring a dark color scheme
    #[arg(long, global = true)]
    prefers_dark: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write a dated backup file
    Export {
        /// Target directory (default: configured backup dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Restore a backup file (keys not in the backup are kept)
    Import { file: PathBuf },
    /// Erase every stored key
    Clear {
        /// Required confirmation; the wipe cannot be undone without a backup
        #[arg(long)]
        yes: bool,
    },
    /// Initialize missing finance data with defaults
    Seed,
    /// Show or change the theme mode
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Show or change the color palette
    Colors {
        #[command(subcommand)]
        action: ColorsAction,
    },
    /// Print the applied theme as CSS
    Css,
}

#[derive(Subcommand)]
enum ThemeAction {
    Get,
    /// light|dark|system
    Set { mode: String },
}

#[derive(Subcommand)]
enum ColorsAction {
    Get,
    Reset,
    /// Set one field, e.g. `primary` or `background.dark`
    Set { field: String, color: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = cli.config.clone().unwrap_or_else(CoreConfig::default_path);
    let mut config = CoreConfig::load(&config_path)?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level, &config.log_dir.to_string_lossy())?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let conn = open_db(&config.db_path)?;
    let store = SqliteStore::new(&conn);
    let host = FixedHost::new(cli.prefers_dark);
    let sheet = StyleSheet::new();

    match cli.command {
        Command::Export { out } => {
            let dir = out.unwrap_or(config.backup_dir);
            let path = BackupService::new(&store).export_backup_to_dir(dir)?;
            println!("backup written to {}", path.display());
        }
        Command::Import { file } => {
            let report = BackupService::new(&store).import_backup_file(&file).await?;
            if let Some(warning) = &report.version_warning {
                eprintln!("warning: {warning}");
            }
            println!("restored {} keys", report.keys_written.len());
        }
        Command::Clear { yes } => {
            if !yes {
                return Err("refusing to clear all data without --yes".into());
            }
            BackupService::new(&store).clear_all_data()?;
            println!("all data cleared");
        }
        Command::Seed => {
            let seeded = initialize_default_data(&store)?;
            if seeded.is_empty() {
                println!("nothing to seed");
            }
            for key in seeded {
                println!("seeded {key}");
            }
        }
        Command::Theme { action } => {
            let prefs = PreferenceService::new(&store, &host, &sheet);
            match action {
                ThemeAction::Get => {
                    println!("{} ({})", prefs.theme_mode(), prefs.appearance());
                }
                ThemeAction::Set { mode } => {
                    let applied = prefs.set_theme_mode_str(&mode)?;
                    println!("{} ({})", applied.mode, applied.appearance);
                }
            }
        }
        Command::Colors { action } => {
            let prefs = PreferenceService::new(&store, &host, &sheet);
            let palette = match action {
                ColorsAction::Get => prefs.custom_colors(),
                ColorsAction::Reset => prefs.reset_custom_colors()?.palette,
                ColorsAction::Set { field, color } => {
                    let mut palette = prefs.custom_colors();
                    if !palette.set_field(&field, color) {
                        return Err(format!(
                            "unknown color field `{field}`; expected one of {}",
                            PALETTE_FIELDS.join(", ")
                        )
                        .into());
                    }
                    prefs.set_custom_colors(&palette)?.palette
                }
            };
            print_palette(&palette);
        }
        Command::Css => {
            let prefs = PreferenceService::new(&store, &host, &sheet);
            prefs.initialize();
            print!("{}", sheet.to_css());
        }
    }
    Ok(())
}

fn print_palette(palette: &ColorPalette) {
    for (field, color) in palette.fields() {
        println!("{field:<17} {color}");
    }
}
