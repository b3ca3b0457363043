use anyhow::Context as _;
use clap::Args;
use std::path::PathBuf;

use super::helpers::Context;

/// Work with the endpoint's introspection schema.
#[derive(Debug, Args)]
pub struct SchemaCmd {
    #[command(subcommand)]
    pub action: SchemaAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum SchemaAction {
    /// Introspect the endpoint and write the schema as JSON.
    ///
    /// Examples:
    ///   hasura-admin schema fetch --output schema.json
    Fetch {
        /// File to write. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(cmd: SchemaCmd, ctx: &Context) -> anyhow::Result<()> {
    match cmd.action {
        SchemaAction::Fetch { output } => {
            let schema = ctx.client()?.introspect().await?;
            let text = serde_json::to_string_pretty(&serde_json::json!({ "__schema": schema }))?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, text)
                        .await
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    eprintln!(
                        "Wrote {} types to {}",
                        schema.types.len(),
                        path.display()
                    );
                }
                None => println!("{}", text),
            }
        }
    }
    Ok(())
}
