//! Session Tree - manage a tree of connection sessions from the shell
//!
//! Run with `session-tree` or `session-tree --help` for usage.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use session_tree::{
    APP_NAME, Config, Directory, Forest, Mutator, NodeId, SessionStore, VERSION,
    console::{ConsoleHost, render_tree},
    session::{Node, RefreshSignal, SelectionProvider, SessionForm},
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Organize connection sessions into directories")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session file to use instead of the configured one
    #[arg(short, long)]
    sessions: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Tree(TreeCommand),

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

/// Commands that operate on the session file
#[derive(Subcommand)]
enum TreeCommand {
    /// Print the session tree (default)
    List,

    /// Add a session
    AddSession {
        /// Host name or address
        #[arg(long)]
        host: String,

        /// Port number
        #[arg(short, long)]
        port: String,

        /// Password
        #[arg(long, default_value = "")]
        password: String,

        /// Directory or sibling session to add at (e.g. "Prod/Cache")
        #[arg(long)]
        at: Option<String>,
    },

    /// Add a directory
    AddDir {
        /// Directory name
        name: String,

        /// Directory to create it in
        #[arg(long)]
        at: Option<String>,
    },

    /// Remove a session or a directory with its contents
    Remove {
        /// Path of the node (e.g. "Prod/10.0.0.1:6379")
        path: String,

        /// Don't ask before removing a non-empty directory
        #[arg(short, long)]
        yes: bool,
    },

    /// Edit a session or rename a directory interactively
    Rename {
        /// Path of the node
        path: String,
    },

    /// Append the sessions from another file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Write the sessions to another file
    Export {
        /// Destination file
        file: PathBuf,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Command output goes to stdout; keep stderr quiet unless something is wrong
        EnvFilter::new("warn")
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

/// Resolve a node path given on the command line
fn resolve(forest: &Forest, path: &str) -> Result<NodeId> {
    forest
        .find_path(path)
        .ok_or_else(|| eyre!("No session or directory at '{}'", path))
}

fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });

    setup_logging(cli.debug || config.debug, config.log_file.as_deref())?;

    match cli.command.unwrap_or(Commands::Tree(TreeCommand::List)) {
        Commands::Config { init } => show_config(&config, cli.config, init),
        Commands::Tree(command) => {
            let session_file = match cli.sessions {
                Some(path) => path,
                None => config.session_file()?,
            };
            info!("Using session file {:?}", session_file);

            let mut store = SessionStore::open_with(&session_file, config.store_options())?;
            let stdin = io::stdin();
            let mut host = ConsoleHost::new(stdin.lock(), io::stdout());

            run(command, &mut store, &mut host)?;

            if host.changed() {
                store.save()?;
                info!("Saved {:?}", store.path());
            }
            Ok(())
        }
    }
}

fn show_config(config: &Config, config_path: Option<PathBuf>, init: bool) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };

    if init {
        config.save_to(&config_path)?;
        println!("Configuration initialized at {:?}", config_path);
    } else {
        println!("Configuration:");
        println!("{}", toml::to_string_pretty(config)?);
        println!("\nConfig file: {:?}", config_path);
        println!("Session file: {:?}", config.session_file()?);
    }
    Ok(())
}

/// Run one tree command; the caller saves if the host saw a change
fn run<R: BufRead, W: Write>(
    command: TreeCommand,
    store: &mut SessionStore,
    host: &mut ConsoleHost<R, W>,
) -> Result<()> {
    match command {
        TreeCommand::List => {
            if store.forest().is_empty() {
                println!("No sessions. Add one with '{} add-session'.", APP_NAME);
            } else {
                print!("{}", render_tree(store.forest()));
            }
        }

        TreeCommand::AddSession {
            host: address,
            port,
            password,
            at,
        } => {
            if let Some(path) = at {
                host.set_selection(Some(resolve(store.forest(), &path)?));
            }
            host.preset_form(SessionForm {
                host: address,
                port,
                password,
                ..Default::default()
            });

            let mut mutator = Mutator::new(store.forest_mut(), host);
            if let Some(id) = mutator.new_session()? {
                let label = mutator.forest().get(id).map(Node::label).unwrap_or_default();
                println!("Added session {}", label);
            }
        }

        TreeCommand::AddDir { name, at } => {
            if let Some(path) = at {
                host.set_selection(Some(resolve(store.forest(), &path)?));
            }
            Directory::validate_name(&name)?;
            host.preset_text(name.clone());

            if Mutator::new(store.forest_mut(), host).add_directory()?.is_some() {
                println!("Added directory {}", name);
            }
        }

        TreeCommand::Remove { path, yes } => {
            let id = resolve(store.forest(), &path)?;
            let is_directory = store.forest().get(id).is_some_and(Node::is_directory);

            host.assume_yes(yes);
            host.set_selection(Some(id));
            let mut mutator = Mutator::new(store.forest_mut(), host);

            if !is_directory {
                mutator.remove_selected_session()?;
                println!("Removed {}", path);
            } else if mutator.remove_selected_directory()? {
                println!("Removed {}", path);
            } else {
                println!("Kept {}", path);
            }
        }

        TreeCommand::Rename { path } => {
            let id = resolve(store.forest(), &path)?;
            host.set_selection(Some(id));
            if !Mutator::new(store.forest_mut(), host).rename_selected()? {
                println!("Unchanged");
            } else if let Some(Node::Directory(dir)) = store.forest().get(id) {
                // Returning an error here skips the save
                Directory::validate_name(&dir.name)?;
            }
        }

        TreeCommand::Import { file } => {
            let imported = store.import_from(&file)?;
            host.notify_changed();
            println!("Imported {} entries from {:?}", imported.len(), file);
        }

        TreeCommand::Export { file } => {
            store.export_to(&file)?;
            println!("Exported sessions to {:?}", file);
        }
    }

    Ok(())
}
