use clap::Args;
use colored::Colorize;
use hasura_admin_sdk::{BaseResource, FindOptions, Sort, SortDirection};

use super::helpers::{parse_assignments, to_filters, to_params, Context};
use crate::output::{self, Format};

/// List, read and edit the rows of a resource.
#[derive(Debug, Args)]
pub struct RecordsCmd {
    #[command(subcommand)]
    pub action: RecordsAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for SortDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Asc => SortDirection::Asc,
            Direction::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum RecordsAction {
    /// List records, one page at a time.
    ///
    /// Values are parsed as JSON when they can be: arrays match any of their
    /// elements, `{"from": .., "to": ..}` is a date range on date columns.
    /// Text columns keep the value as typed. Unknown fields are ignored.
    ///
    /// Examples:
    ///   hasura-admin records list person --limit 20 --sort-by name --direction desc
    ///   hasura-admin records list person --filter 'person_id=[1,2]'
    ///   hasura-admin records list person --filter 'born_at={"from":"2020-01-01"}'
    List {
        /// Resource (table) name.
        resource: String,
        /// Page size.
        #[arg(short = 'l', long, default_value_t = 10)]
        limit: u64,
        /// Rows to skip.
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Column to order by.
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort direction.
        #[arg(long, value_enum, default_value = "asc")]
        direction: Direction,
        /// FIELD=VALUE filter. Repeatable.
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,
    },
    /// Count records matching the filters.
    Count {
        resource: String,
        /// FIELD=VALUE filter. Repeatable.
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,
    },
    /// Show one record by primary key.
    Read { resource: String, id: String },
    /// Show several records by primary key.
    ReadMany {
        resource: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Insert a record.
    ///
    /// Examples:
    ///   hasura-admin records create person --set name=Ann --set meta.city=Oslo
    Create {
        resource: String,
        /// FIELD=VALUE to set. Dotted fields address nested JSON columns.
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        values: Vec<String>,
    },
    /// Update a record by primary key.
    Update {
        resource: String,
        id: String,
        /// FIELD=VALUE to set. Dotted fields address nested JSON columns.
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        values: Vec<String>,
    },
    /// Delete a record by primary key.
    Delete { resource: String, id: String },
}

pub async fn run(cmd: RecordsCmd, ctx: &Context, format: Format) -> anyhow::Result<()> {
    match cmd.action {
        RecordsAction::List {
            resource,
            limit,
            offset,
            sort_by,
            direction,
            filters,
        } => {
            let assignments = parse_assignments(&filters)?;
            let resource = ctx.resource(&resource).await?;
            let mut options = FindOptions::default().limit(limit).offset(offset);
            if let Some(field) = sort_by {
                options = options.sort(Sort::by(field, direction.into()));
            }
            let records = resource
                .find(&to_filters(&resource, assignments), options)
                .await?;
            output::print_records(&records, format)?;
        }
        RecordsAction::Count { resource, filters } => {
            let assignments = parse_assignments(&filters)?;
            let resource = ctx.resource(&resource).await?;
            let count = resource.count(&to_filters(&resource, assignments)).await?;
            match format {
                Format::Json => output::print_one(&serde_json::json!({ "count": count }), format)?,
                Format::Human => println!("{}", count),
            }
        }
        RecordsAction::Read { resource, id } => {
            let resource = ctx.resource(&resource).await?;
            let record = resource.find_one(&id).await?;
            if record.is_empty() {
                anyhow::bail!("No {} with {} = {}", resource.id(), resource.pk_property(), id);
            }
            output::print_one(&record.to_json(), format)?;
        }
        RecordsAction::ReadMany { resource, ids } => {
            let resource = ctx.resource(&resource).await?;
            let records = resource.find_many(&ids).await?;
            output::print_records(&records, format)?;
        }
        RecordsAction::Create { resource, values } => {
            let assignments = parse_assignments(&values)?;
            let resource = ctx.resource(&resource).await?;
            let params = to_params(&resource, assignments);
            let record = resource.create(params).await?;
            output::print_one(&record.to_json(), format)?;
        }
        RecordsAction::Update {
            resource,
            id,
            values,
        } => {
            let assignments = parse_assignments(&values)?;
            let resource = ctx.resource(&resource).await?;
            let params = to_params(&resource, assignments);
            let record = resource.update(&id, params).await?;
            output::print_one(&record.to_json(), format)?;
        }
        RecordsAction::Delete { resource, id } => {
            let resource = ctx.resource(&resource).await?;
            resource.delete(&id).await?;
            match format {
                Format::Json => output::print_one(
                    &serde_json::json!({ "id": id, "deleted": true }),
                    format,
                )?,
                Format::Human => println!("Deleted {} {}", resource.id(), id.green()),
            }
        }
    }
    Ok(())
}
