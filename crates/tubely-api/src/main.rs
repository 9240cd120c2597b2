use anyhow::Context;
use clap::{Parser, Subcommand};
use tubely_api::auth::issue_access_token;
use tubely_core::Config;

#[derive(Parser)]
#[command(name = "tubely-api", about = "Tubely thumbnail service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print an access token for local testing, signed with JWT_SECRET
    IssueToken {
        /// Subject (user id) the token is issued to
        subject: String,
        /// Lifetime in seconds
        #[arg(long, default_value = "3600")]
        ttl_seconds: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;
            tubely_api::setup::server::start_server(&config, router).await?;
        }
        Commands::IssueToken {
            subject,
            ttl_seconds,
        } => {
            config.validate()?;
            let token = issue_access_token(
                &subject,
                &config.jwt_secret,
                &config.jwt_issuer,
                chrono::Duration::seconds(ttl_seconds),
            )
            .context("Failed to issue access token")?;
            println!("{}", token);
        }
    }

    Ok(())
}
