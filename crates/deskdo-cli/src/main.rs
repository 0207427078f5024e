mod commands;

use clap::{Parser, Subcommand};
use commands::Ctx;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deskdo", about = "Small grouped to-do list", version)]
struct Cli {
    /// Directory holding todo_data.json and todo_config.json
    /// (default: $DESKDO_DIR, then the current directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// Task text
        text: String,

        /// Target group (default: current group)
        #[arg(short, long)]
        group: Option<String>,
    },

    /// List the tasks of a group
    List {
        /// Group to list (default: current group)
        #[arg(short, long)]
        group: Option<String>,

        /// Include completed tasks even if hidden by preference
        #[arg(short, long)]
        all: bool,
    },

    /// Toggle a task between open and completed
    Done {
        /// Task ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Replace the text of a task
    Edit {
        /// Task ID (full or prefix, minimum 4 chars)
        id: String,

        /// New text
        text: String,
    },

    /// Delete a task
    Rm {
        /// Task ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Move a task one place up in its group
    Up {
        /// Task ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Move a task one place down in its group
    Down {
        /// Task ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Set the complete order of a group
    Reorder {
        /// Group to reorder (default: current group)
        #[arg(short, long)]
        group: Option<String>,

        /// Every task ID of the group, in the new order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Show or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Resolve what closing the window does, optionally recording a choice
    Close {
        /// Hide to the tray
        #[arg(long, conflicts_with = "quit")]
        to_tray: bool,

        /// Quit the program
        #[arg(long)]
        quit: bool,

        /// Remember the choice and stop asking
        #[arg(long)]
        remember: bool,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// List groups
    List,
    /// Create a group and switch to it
    Add {
        /// Group name
        name: String,
    },
    /// Rename a group
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Delete a group, moving its tasks to the default group
    Delete {
        /// Group name
        name: String,
    },
    /// Switch the current group
    Switch {
        /// Group name
        name: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all preferences
    Show,
    /// Set a preference (show-completed, auto-hide, close-to-tray, remember-choice)
    Set {
        /// Preference key
        key: String,
        /// true or false
        value: String,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DESKDO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let ctx = Ctx::new(cli.data_dir, cli.json);

    let result = match cli.command {
        Commands::Add { text, group } => commands::task::add(&ctx, text, group),
        Commands::List { group, all } => commands::task::list(&ctx, group, all),
        Commands::Done { id } => commands::task::done(&ctx, id),
        Commands::Edit { id, text } => commands::task::edit(&ctx, id, text),
        Commands::Rm { id } => commands::task::remove(&ctx, id),
        Commands::Up { id } => commands::task::up(&ctx, id),
        Commands::Down { id } => commands::task::down(&ctx, id),
        Commands::Reorder { group, ids } => commands::task::reorder(&ctx, group, ids),
        Commands::Group { action } => match action {
            GroupAction::List => commands::group::list(&ctx),
            GroupAction::Add { name } => commands::group::add(&ctx, name),
            GroupAction::Rename { old, new } => commands::group::rename(&ctx, old, new),
            GroupAction::Delete { name } => commands::group::delete(&ctx, name),
            GroupAction::Switch { name } => commands::group::switch(&ctx, name),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx),
            ConfigAction::Set { key, value } => commands::config::set(&ctx, key, value),
        },
        Commands::Close {
            to_tray,
            quit,
            remember,
        } => commands::close::run(&ctx, to_tray, quit, remember),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
