use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{execute_check_command, execute_serve_command, CheckArgs, ServeArgs};

#[derive(Parser)]
#[command(name = "tickets")]
#[command(about = "Tickets - a minimal ticket-tracking REST API backed by a JSON file")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST server
    Serve(ServeCommandArgs),
    /// Inspect the ticket data file without starting the server
    Check(CheckCommandArgs),
}

#[derive(Args)]
pub struct ServeCommandArgs {
    /// Interface to bind
    #[arg(long, env = "TICKETS_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// JSON file holding the tickets
    #[arg(short, long, env = "TICKETS_DATA_FILE", default_value = "data.json")]
    pub data: PathBuf,
}

#[derive(Args)]
pub struct CheckCommandArgs {
    /// JSON file holding the tickets
    #[arg(short, long, env = "TICKETS_DATA_FILE", default_value = "data.json")]
    pub data: PathBuf,
}

const DEFAULT_LOG_FILTER: &str = "tickets=debug,info";

fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_LOG_FILTER),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve(args) => {
            let serve_args = ServeArgs {
                host: args.host,
                port: args.port,
                data: args.data,
            };
            execute_serve_command(serve_args).await
        }
        Commands::Check(args) => execute_check_command(CheckArgs { data: args.data }).await,
    }
}
