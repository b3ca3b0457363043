use hasura_admin_sdk::{BaseProperty, BaseResource, Property};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::Context;
use crate::output::{self, Format};

#[derive(Debug, Serialize, Tabled)]
pub struct ResourceRow {
    pub id: String,
    pub parent: String,
    pub pk_property: String,
    pub relationships: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct PropertyRow {
    pub name: String,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub property_type: String,
    pub array: bool,
    pub required: bool,
    pub editable: bool,
    pub sortable: bool,
    pub reference: String,
}

impl From<&Property> for PropertyRow {
    fn from(p: &Property) -> Self {
        Self {
            name: p.name().to_string(),
            property_type: p.property_type().to_string(),
            array: p.is_array(),
            required: p.is_required(),
            editable: p.is_editable(),
            sortable: p.is_sortable(),
            reference: p.reference().unwrap_or_default().to_string(),
        }
    }
}

/// List the resources declared in the config file.
pub fn list(ctx: &Context, format: Format) -> anyhow::Result<()> {
    let rows: Vec<ResourceRow> = ctx
        .config
        .resources
        .iter()
        .map(|r| ResourceRow {
            id: r.id.clone(),
            parent: r.parent.clone().unwrap_or_default(),
            pk_property: r.pk_property.clone(),
            relationships: r
                .relationships
                .iter()
                .map(|(field, rel)| {
                    format!("{} -> {}.{}", field, rel.resource_name, rel.reference_field)
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    output::print_table(&rows, format)
}

/// Describe the properties of one resource.
pub async fn properties(resource: &str, ctx: &Context, format: Format) -> anyhow::Result<()> {
    let resource = ctx.resource(resource).await?;
    let rows: Vec<PropertyRow> = resource
        .properties()
        .iter()
        .filter(|p| p.is_visible())
        .map(PropertyRow::from)
        .collect();
    output::print_table(&rows, format)
}
