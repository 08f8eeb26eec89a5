use clap::Parser;
use liftoff::cli::{check, launch, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Launch(args) => launch::execute(args).await,
        Commands::Check(CheckCommand::Platform) => check::execute_platform(),
        Commands::Check(CheckCommand::Credentials) => check::execute_credentials(),
        Commands::Check(CheckCommand::Refresh) => check::execute_refresh().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
