use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod build;
mod commands;
mod config;
mod server;
mod util;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: KilnCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "kiln.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// File served for directory requests
    #[arg(long, default_value = "index.html")]
    index: String,

    /// Open the project in the default browser
    #[arg(short, long, default_value = "false")]
    open: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = "kiln.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "kiln.yaml")]
    config_file: Option<PathBuf>,

    /// Print what would be deleted without deleting it
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum KilnCommand {
    /// Initialize a new kiln site
    Init(InitArgs),

    /// Build the site
    Build(BuildArgs),

    /// Build the site and serve it on a local port
    Serve(ServeArgs),

    /// Delete the built site
    Clean(CleanArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        KilnCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        KilnCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        KilnCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
        KilnCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(())
}
