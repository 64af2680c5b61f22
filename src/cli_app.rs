//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use todolist::cli::{Menu, parse_task_number, render_progress, render_table};
use todolist::core::config::Config;
use todolist::core::errors::{ErrorClass, TodoError};
use todolist::core::paths::resolve_absolute_path;
use todolist::logger::jsonl::{ActivityLog, JsonlConfig};
use todolist::session::{Commit, SaveStatus, Session};
use todolist::storage::file::TaskFile;
use todolist::tasks::list::{Outcome, Skip};

/// Console to-do list with undo.
#[derive(Debug, Parser)]
#[command(
    name = "todo",
    author,
    version,
    about = "Console to-do list with multi-level undo",
    long_about = None
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the task file.
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Start the interactive menu with autosave off.
    #[arg(long, global = true)]
    no_autosave: bool,
    /// Subcommand to execute; the interactive menu when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the interactive menu.
    Menu,
    /// Append a task.
    Add(AddArgs),
    /// Print the task table and progress.
    List,
    /// Mark a task completed.
    Done(NumberArgs),
    /// Mark a task not completed.
    Undone(NumberArgs),
    /// Flip a task's completion.
    Toggle(NumberArgs),
    /// Remove a task.
    Delete(NumberArgs),
    /// Replace a task's text.
    Edit(EditArgs),
    /// Mark every task completed.
    MarkAll,
    /// Mark every task not completed.
    UnmarkAll,
    /// Move completed tasks ahead of pending ones.
    Sort,
    /// Write the list as plain text.
    Export(ExportArgs),
    /// Inspect configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct AddArgs {
    /// Task text.
    text: String,
}

#[derive(Debug, Clone, Args)]
struct NumberArgs {
    /// 1-based task number.
    #[arg(allow_hyphen_values = true)]
    number: String,
}

#[derive(Debug, Clone, Args)]
struct EditArgs {
    /// 1-based task number.
    #[arg(allow_hyphen_values = true)]
    number: String,
    /// New task text.
    text: String,
}

#[derive(Debug, Clone, Args)]
struct ExportArgs {
    /// Destination text file.
    path: String,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Persistence or environment failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<TodoError> for CliError {
    fn from(error: TodoError) -> Self {
        match error.class() {
            ErrorClass::User | ErrorClass::Config => Self::User(error.to_string()),
            ErrorClass::Persistence => Self::Runtime(error.to_string()),
            ErrorClass::Internal => Self::Internal(error.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Some(Command::Completions(args)) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
        Some(Command::Config(args)) => run_config(cli, args),
        None | Some(Command::Menu) => run_menu(cli),
        Some(command) => run_one_shot(cli, command),
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let config = Config::load(cli.config.as_deref())?;
    if !config.display.color {
        control::set_override(false);
    }
    Ok(config)
}

fn open_session(cli: &Cli, config: &Config, autosave: bool) -> Result<Session<TaskFile>, CliError> {
    let data_file = cli
        .file
        .as_deref()
        .map_or_else(|| config.data_file(), resolve_absolute_path);
    let file = TaskFile::new(data_file);
    let tasks = file.load()?;

    let log = if config.logging.enabled {
        ActivityLog::open(JsonlConfig {
            path: config.activity_log(),
            max_size_bytes: config.logging.max_size_bytes,
        })
    } else {
        ActivityLog::disabled()
    };

    Ok(Session::new(tasks, file, autosave, log))
}

fn run_menu(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let autosave = config.storage.autosave && !cli.no_autosave;
    let session = open_session(cli, &config, autosave)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(session, stdin.lock(), stdout.lock())
        .with_bar_width(config.display.progress_bar_width);
    let result = menu.run();
    let _ = menu.into_session().finish();
    result.map_err(CliError::from)
}

// ---------------------------------------------------------------------------
// One-shot subcommands
// ---------------------------------------------------------------------------

fn run_one_shot(cli: &Cli, command: &Command) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut session = open_session(cli, &config, true)?;
    let mode = output_mode(cli);

    let bar_width = config.display.progress_bar_width;
    let result = dispatch_one_shot(&mut session, command, mode, bar_width);
    let _ = session.finish();
    result
}

fn dispatch_one_shot(
    session: &mut Session<TaskFile>,
    command: &Command,
    mode: OutputMode,
    bar_width: usize,
) -> Result<(), CliError> {
    let len = session.tasks().len();
    match command {
        Command::List => emit_list(session, mode, bar_width),
        Command::Add(args) => {
            let commit = session.add_task(&args.text);
            let number = session.tasks().len();
            let message = format!("Task #{number} added!");
            emit_change(mode, "add", Some(number), &message, &commit)?;
            check_saved(commit)
        }
        Command::Done(args) => {
            let index = parse_task_number(&args.number, len)?;
            let commit = session.mark_task(index)?;
            let message = match commit.outcome {
                Outcome::Skipped(_) => "Task is already marked as completed.",
                _ => "Task marked as complete.",
            };
            emit_change(mode, "done", Some(index + 1), message, &commit)?;
            check_saved(commit)
        }
        Command::Undone(args) => {
            let index = parse_task_number(&args.number, len)?;
            let commit = session.unmark_task(index)?;
            let message = match commit.outcome {
                Outcome::Skipped(_) => "Task is already not marked as completed.",
                _ => "Task marked as not complete.",
            };
            emit_change(mode, "undone", Some(index + 1), message, &commit)?;
            check_saved(commit)
        }
        Command::Toggle(args) => {
            let index = parse_task_number(&args.number, len)?;
            let commit = session.toggle_task(index)?;
            let message = "Task status toggled.";
            emit_change(mode, "toggle", Some(index + 1), message, &commit)?;
            check_saved(commit)
        }
        Command::Delete(args) => {
            let index = parse_task_number(&args.number, len)?;
            let commit = session.delete_task(index)?;
            emit_change(mode, "delete", Some(index + 1), "Task deleted.", &commit)?;
            check_saved(commit)
        }
        Command::Edit(args) => {
            let index = parse_task_number(&args.number, len)?;
            let commit = session.edit_task(index, &args.text)?;
            emit_change(mode, "edit", Some(index + 1), "Task updated.", &commit)?;
            check_saved(commit)
        }
        Command::MarkAll => {
            let commit = session.mark_all();
            let message = match commit.outcome {
                Outcome::Applied { affected } => {
                    format!("Marked {affected} task(s) as completed.")
                }
                _ => "All tasks are already completed.".to_string(),
            };
            emit_change(mode, "mark-all", None, &message, &commit)?;
            check_saved(commit)
        }
        Command::UnmarkAll => {
            let commit = session.unmark_all();
            let message = match commit.outcome {
                Outcome::Applied { affected } => {
                    format!("Marked {affected} task(s) as not completed.")
                }
                _ => "All tasks are already not completed.".to_string(),
            };
            emit_change(mode, "unmark-all", None, &message, &commit)?;
            check_saved(commit)
        }
        Command::Sort => {
            let commit = session.sort_by_completed();
            let message = if commit.outcome == Outcome::Skipped(Skip::AlreadySorted) {
                "List is already sorted."
            } else {
                "List sorted."
            };
            emit_change(mode, "sort", None, message, &commit)?;
            check_saved(commit)
        }
        Command::Export(args) => {
            let path = session.export_text(&args.path)?;
            match mode {
                OutputMode::Human => {
                    println!("{} {}", "Tasks exported to:".green(), path.display());
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "export",
                    "path": path.to_string_lossy(),
                    "count": session.tasks().len(),
                }))?,
            }
            Ok(())
        }
        Command::Menu | Command::Config(_) | Command::Completions(_) => {
            let details = "command is not a one-shot task command".to_string();
            Err(CliError::Internal(details))
        }
    }
}

fn emit_list(
    session: &Session<TaskFile>,
    mode: OutputMode,
    bar_width: usize,
) -> Result<(), CliError> {
    let progress = session.list().progress();
    match mode {
        OutputMode::Human => {
            let mut lines = render_table(session.tasks());
            lines.push(format!("\n{}", "Progress:".blue()));
            lines.push(render_progress(&progress, bar_width));
            writeln!(io::stdout().lock(), "{}", lines.join("\n"))?;
        }
        OutputMode::Json => {
            let tasks = serde_json::to_value(session.tasks())?;
            write_json_line(&json!({
                "command": "list",
                "tasks": tasks,
                "completed": progress.completed,
                "total": progress.total,
            }))?;
        }
    }
    Ok(())
}

fn emit_change(
    mode: OutputMode,
    command: &str,
    number: Option<usize>,
    message: &str,
    commit: &Commit,
) -> Result<(), CliError> {
    match mode {
        OutputMode::Human => {
            if commit.outcome.changed() {
                println!("{}", message.green());
            } else {
                println!("{}", message.yellow());
            }
        }
        OutputMode::Json => {
            let saved = matches!(commit.save, SaveStatus::Saved);
            write_json_line(&json!({
                "command": command,
                "number": number,
                "changed": commit.outcome.changed(),
                "saved": saved,
                "message": message,
            }))?;
        }
    }
    Ok(())
}

fn check_saved(commit: Commit) -> Result<(), CliError> {
    match commit.save {
        SaveStatus::Failed(e) => Err(CliError::Runtime(format!("autosave failed: {e}"))),
        SaveStatus::Saved | SaveStatus::NotRequested => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.source.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.source.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "error": e.to_string(),
                            "code": e.code(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("TODOLIST_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}
