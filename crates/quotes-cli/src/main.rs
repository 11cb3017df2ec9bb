use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quotes_cli::cli::{execute, open_app, remote_source, CliCommand, CliOptions};
use quotes_core::constants::EXPORT_FILE_NAME;
use quotes_core::tracing_setup::init_tracing;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Random quotes with categories, import/export and server sync")]
struct Cli {
    /// Path to JSON config file (dataDir, remoteUrl, pollIntervalSecs, ...)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Directory holding local_storage.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the remote quote source
    #[arg(long, global = true)]
    remote_url: Option<String>,

    /// Keep all state in memory for this invocation
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Show {
        /// Pick from this category without changing the saved selection
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a new quote
    Add {
        /// Quote text
        text: String,
        /// Category label
        #[arg(long)]
        category: String,
        /// Do not send the quote to the server
        #[arg(long)]
        no_push: bool,
    },

    /// List categories
    Categories,

    /// Select a category ("all" for everything)
    Filter {
        value: String,
    },

    /// Export all quotes to a JSON file
    Export {
        #[arg(default_value = EXPORT_FILE_NAME)]
        path: PathBuf,
    },

    /// Append quotes from a JSON file
    Import {
        path: PathBuf,
    },

    /// Fetch from the server once and merge (server wins)
    Sync,

    /// Interactive session with background sync
    Run,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let command = match cli.command {
        Some(Commands::Show { category }) => CliCommand::Show { category },
        Some(Commands::Add {
            text,
            category,
            no_push,
        }) => CliCommand::Add {
            text,
            category,
            no_push,
        },
        Some(Commands::Categories) => CliCommand::Categories,
        Some(Commands::Filter { value }) => CliCommand::Filter { value },
        Some(Commands::Export { path }) => CliCommand::Export { path },
        Some(Commands::Import { path }) => CliCommand::Import { path },
        Some(Commands::Sync) => CliCommand::Sync,
        Some(Commands::Run) => CliCommand::Run,
        // No command - show a quote
        None => CliCommand::Show { category: None },
    };

    let options = CliOptions {
        config: cli.config,
        data_dir: cli.data_dir,
        remote_url: cli.remote_url,
        ephemeral: cli.ephemeral,
    };

    match run(command, &options).await {
        Ok(false) => {}
        Ok(true) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: CliCommand, options: &CliOptions) -> anyhow::Result<bool> {
    let config = options.resolve_config()?;
    let kv = options.open_storage(&config)?;
    let mut app = open_app(kv, &config);
    let source = remote_source(&config)?;

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    execute(command, &mut app, &config, source, &mut stdout, &mut stderr).await
}
