use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volmatch::cli::{describe_failure, Cli, Commands, EXIT_UNREACHABLE};
use volmatch::output::{format_json, format_output, format_registration, format_registrations, format_report};
use volmatch::registration::RegistrationService;
use volmatch::storage::{provision_containers, ProvisionMode, Repositories};
use volmatch_core::storage::StoreGateway as _;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volmatch=info,volmatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            let (code, message) = describe_failure(&error);
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let gateway = cli.store.gateway()?;
    let repos = Repositories::new(gateway.clone(), cli.store.decode_policy);
    let service = RegistrationService::new(repos);

    match cli.command {
        Commands::Check => {
            let connected = gateway.check_connection().await;
            println!("{}", format_json(&serde_json::json!({ "connected": connected })));
            if !connected {
                eprintln!("Store unreachable; see the log for the failed request");
                return Ok(ExitCode::from(EXIT_UNREACHABLE));
            }
        }
        Commands::Provision { sql } => {
            let mode = if sql { ProvisionMode::Sql } else { ProvisionMode::Rest };
            let report = provision_containers(gateway.as_ref(), mode).await;
            println!("{}", format_output(&report, cli.format, format_report));
            if !report.is_complete() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Register { user, opportunity } => {
            let id = service.register(&user, &opportunity).await?;
            println!("{}", format_json(&serde_json::json!({ "id": id })));
        }
        Commands::Approve { id } => {
            let registration = service.approve(&id).await?;
            println!("{}", format_output(&registration, cli.format, format_registration));
        }
        Commands::Reject { id } => {
            let registration = service.reject(&id).await?;
            println!("{}", format_output(&registration, cli.format, format_registration));
        }
        Commands::Registrations { org } => {
            let registrations = service.find_by_organization(&org).await?;
            println!(
                "{}",
                format_output(registrations.as_slice(), cli.format, format_registrations)
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
