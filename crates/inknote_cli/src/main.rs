//! InkNote command-line front end.
//!
//! # Responsibility
//! - Drive the core note service from a terminal.
//! - Provide a stdin-backed directory chooser for `choose`.

mod prompt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use inknote_core::{default_settings_path, Note, NoteService, NoteStore};
use log::debug;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "inknote")]
#[command(author, version, about = "Manage HTML notes stored in a folder")]
struct Cli {
    /// Notes folder for this invocation (overrides the saved folder)
    #[arg(long, short = 'd', global = true, env = "INKNOTE_DATA_DIR")]
    dir: Option<PathBuf>,

    /// Settings file holding the saved notes folder
    #[arg(long, global = true, env = "INKNOTE_SETTINGS_PATH")]
    settings: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print listings as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current notes folder
    Dir,
    /// Pick the notes folder interactively and save it
    Choose,
    /// Save PATH as the notes folder
    SetDir { path: PathBuf },
    /// List notes
    List,
    /// Print a note's content
    Read { filename: String },
    /// Create or overwrite a note (content from --content or stdin)
    Save {
        filename: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Create an empty note with the next default title
    New,
    /// Delete a note
    Delete { filename: String },
    /// Rename a note; prints the new filename
    Rename { filename: String, title: String },
}

fn main() -> ExitCode {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::try_with_str(&cli.log_level)
        .with_context(|| format!("invalid log level `{}`", cli.log_level))?
        .start()
        .context("failed to start logger")?;

    let mut service = open_service(&cli)?;
    debug!(
        "event=cli_start module=cli status=ok configured={}",
        service.data_dir().is_some()
    );

    match cli.command {
        Commands::Dir => match service.data_dir() {
            Some(dir) => println!("{}", dir.display()),
            None => println!("(no notes folder set)"),
        },
        Commands::Choose => {
            let chooser = prompt::PromptChooser::stdin();
            match service.choose_data_dir(&chooser)? {
                Some(dir) => println!("{}", dir.display()),
                None => println!("Cancelled."),
            }
        }
        Commands::SetDir { path } => {
            service.set_data_dir(path)?;
        }
        Commands::List => print_notes(&service.list_notes()?, cli.json)?,
        Commands::Read { filename } => {
            let opened = service.open_note(&filename)?;
            print!("{}", opened.content);
        }
        Commands::Save { filename, content } => {
            let content = match content {
                Some(content) => content,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read note content from stdin")?;
                    buf
                }
            };
            service.save_note(&filename, &content)?;
        }
        Commands::New => {
            let note = service.create_note()?;
            println!("{}", note.filename);
        }
        Commands::Delete { filename } => service.delete_note(&filename)?,
        Commands::Rename { filename, title } => {
            ensure_title(&title)?;
            let note = service.rename_note(&filename, &title)?;
            println!("{}", note.filename);
        }
    }
    Ok(())
}

fn open_service(cli: &Cli) -> Result<NoteService> {
    let changes_dir = matches!(cli.command, Commands::SetDir { .. } | Commands::Choose);
    if let Some(dir) = &cli.dir {
        // --dir is a one-off override; settings are neither read nor written.
        if !changes_dir {
            return Ok(NoteService::new(NoteStore::with_root(dir)));
        }
    }

    let Some(path) = cli.settings.clone().or_else(default_settings_path) else {
        return Ok(NoteService::new(NoteStore::new()));
    };
    if changes_dir {
        // These commands rewrite the settings file, so a broken one is replaced.
        return Ok(NoteService::restore(path));
    }
    NoteService::with_settings(&path)
        .with_context(|| format!("failed to load settings from `{}`", path.display()))
}

fn ensure_title(title: &str) -> Result<()> {
    anyhow::ensure!(!title.trim().is_empty(), "note title cannot be blank");
    Ok(())
}

fn print_notes(notes: &[Note], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(notes)?);
        return Ok(());
    }
    if notes.is_empty() {
        println!("No notes.");
    }
    for note in notes {
        println!("{}\t{}", note.title, note.filename);
    }
    Ok(())
}
