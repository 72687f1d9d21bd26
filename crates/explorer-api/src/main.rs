//! Axum Explorer CLI and REST API entry point.
//!
//! Binary name: `explorer`
//!
//! Parses CLI arguments, initializes tracing, config, database and services,
//! then dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{AdminCommand, Cli, CommissionCommand, Commands, ProviderCommand, UserCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    explorer_observe::init_tracing_with_filter(cli.log_format.into(), cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "explorer", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let result = run(cli, state).await;

    explorer_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Serve { port, host } => {
            cli::serve::serve(state, host, port, cli.quiet).await?;
        }

        Commands::Seed => {
            cli::seed::seed(&state, json).await?;
        }

        Commands::Admin { action } => match action {
            AdminCommand::Create {
                name,
                email,
                password,
            } => {
                cli::admin::create_admin(&state, &name, &email, password, json).await?;
            }
        },

        Commands::User { action } => match action {
            UserCommand::List => cli::user::list_users(&state, json).await?,
            UserCommand::Verify { email } => cli::user::verify_user(&state, &email, json).await?,
        },

        Commands::Provider { action } => match action {
            ProviderCommand::List {
                status,
                service_type,
            } => {
                cli::provider::list_providers(&state, status, service_type, json).await?;
            }
            ProviderCommand::Verify { id } => {
                cli::provider::verify_provider(&state, &id, json).await?;
            }
            ProviderCommand::Reject { id } => {
                cli::provider::reject_provider(&state, &id, json).await?;
            }
        },

        Commands::Commission { action } => match action {
            CommissionCommand::Pending => cli::commission::list_pending(&state, json).await?,
            CommissionCommand::Pay { id } => cli::commission::pay(&state, &id, json).await?,
        },

        Commands::Revenue { provider, from, to } => {
            cli::revenue::revenue(&state, provider, from, to, json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
