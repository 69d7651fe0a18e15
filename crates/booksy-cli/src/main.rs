//! Booksy CLI
//!
//! Command-line interface for Booksy - draft books from format templates and
//! export them as Word documents.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use booksy_core::{Config, ExportFormat, Store};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "booksy")]
#[command(about = "Booksy - draft books from templates and export them")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging for booksy crates
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new book from a format template
    New {
        /// Book title
        title: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Book format (see `booksy formats`)
        #[arg(short, long, default_value = "novel")]
        format: String,
    },
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Show a book and its sections
    Show {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// List the supported book formats
    Formats,
    /// Read or edit a section
    Section {
        #[command(subcommand)]
        command: SectionCommands,
    },
    /// Add or delete chapters
    Chapter {
        #[command(subcommand)]
        command: ChapterCommands,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Export a book to a document
    Export {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Output file (default: <title>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format: docx or markdown
        #[arg(short, long, default_value = "docx")]
        format: ExportFormat,
        /// Open the exported file afterwards
        #[arg(long)]
        open: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum SectionCommands {
    /// Print the text of a section
    Show {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Section key, e.g. chapter_1
        key: String,
    },
    /// Replace the text of a section (opens $EDITOR without --text/--file)
    Edit {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Section key, e.g. chapter_1
        key: String,
        /// New section text
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,
        /// Read the new section text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ChapterCommands {
    /// Append a new numbered chapter
    Add {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Delete a chapter (chapter_1 and chapter_2 are kept)
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Chapter key, e.g. chapter_3
        key: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, export_font, export_font_size)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file directly and don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config, cli.verbose);

    if let Commands::Formats = &cli.command {
        return commands::book::formats(&output);
    }

    let mut store = Store::open_with_config(config).context("Failed to open book store")?;
    if let Some(notice) = store.take_corruption() {
        output.warning(&notice.to_string());
        if let Some(suggestion) = notice.recovery_suggestion() {
            output.warning(suggestion);
        }
    }
    for line in skipped_record_warnings(&store) {
        output.warning(&line);
    }

    let result = match cli.command {
        Commands::New {
            title,
            author,
            format,
        } => commands::book::create(&mut store, &title, &author, &format, &output),
        Commands::List => commands::book::list(&store, &output),
        Commands::Show { id } => commands::book::show(&store, &id, &output),
        Commands::Section { command } => handle_section_command(command, &mut store, &output),
        Commands::Chapter { command } => handle_chapter_command(command, &mut store, &output),
        Commands::Delete { id, yes } => commands::book::delete(&mut store, &id, yes, &output),
        Commands::Export {
            id,
            output: path,
            format,
            open,
        } => commands::export::export(&store, &id, path, format, open, &output),
        Commands::Formats | Commands::Config { .. } => Ok(()),
    };

    if let Err(e) = &result {
        debug!(error = ?e, "Command failed");
        if let Some(suggestion) = commands::recovery_suggestion(e) {
            output.warning(suggestion);
        }
    }

    result
}

/// Lines describing records that were left out of the loaded store
fn skipped_record_warnings(store: &Store) -> Vec<String> {
    let skipped = store.skipped_records();
    if skipped.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<String> = skipped
        .iter()
        .map(|record| format!("Skipped unreadable book {}: {}", record.key, record.reason))
        .collect();
    if let Some(backup) = store.backup_path() {
        lines.push(format!("The original store file was copied to {}", backup.display()));
    }
    lines
}

fn handle_section_command(
    command: SectionCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        SectionCommands::Show { id, key } => commands::section::show(store, &id, &key, output),
        SectionCommands::Edit {
            id,
            key,
            text,
            file,
        } => commands::section::edit(store, &id, &key, text, file, output),
    }
}

fn handle_chapter_command(
    command: ChapterCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        ChapterCommands::Add { id } => commands::chapter::add(store, &id, output),
        ChapterCommands::Delete { id, key, yes } => {
            commands::chapter::delete(store, &id, &key, yes, output)
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins when set. Logs go to `log_file` from the configuration,
/// falling back to stderr if that file cannot be opened.
fn init_logging(config: &Config, verbose: bool) {
    let default_directives = if verbose {
        "booksy_core=debug,booksy_cli=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let log_file = config.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                None
            }
        }
    });

    // Ignore error if already initialized
    let _ = match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(file)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
