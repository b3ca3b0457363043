mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::helpers::Context;
use config::ResourcesConfig;

/// hasura-admin: browse and edit Hasura tables as admin-panel resources
#[derive(Debug, Parser)]
#[command(name = "hasura-admin", version, about)]
struct Cli {
    /// GraphQL endpoint (overrides $HASURA_GRAPHQL_ENDPOINT).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Admin secret (overrides $HASURA_GRAPHQL_ADMIN_SECRET).
    #[arg(long, global = true)]
    admin_secret: Option<String>,

    /// Role to run requests as.
    #[arg(long, global = true)]
    role: Option<String>,

    /// Introspection schema JSON. Fetched from the endpoint when omitted.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Resource configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format. Auto-detected if not specified (human for terminal, json for pipe).
    #[arg(long, global = true)]
    format: Option<output::Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Work with the introspection schema.
    Schema(commands::schema::SchemaCmd),
    /// List configured resources.
    Resources,
    /// Describe the properties of a resource.
    Properties {
        /// Resource (table) name.
        resource: String,
    },
    /// List, read and edit records.
    Records(commands::records::RecordsCmd),
    /// Print a compact command reference.
    Usage,
}

fn init_tracing() {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = output::resolve_format(cli.format);
    let config = match &cli.config {
        Some(path) => ResourcesConfig::load(path)?,
        None => ResourcesConfig::default(),
    };
    let ctx = Context {
        endpoint: cli.endpoint,
        admin_secret: cli.admin_secret,
        role: cli.role,
        schema_path: cli.schema,
        config,
    };

    match cli.command {
        Command::Schema(cmd) => commands::schema::run(cmd, &ctx).await,
        Command::Resources => commands::resources::list(&ctx, format),
        Command::Properties { resource } => {
            commands::resources::properties(&resource, &ctx, format).await
        }
        Command::Records(cmd) => commands::records::run(cmd, &ctx, format).await,
        Command::Usage => {
            commands::usage::run();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
