//! Resource configuration file.
//!
//! ```toml
//! [policy]
//! hide_password_fields = true
//!
//! [[resource]]
//! id = "person"
//! parent = "Hasura"
//! pk_property = "person_id"
//!
//! [resource.relationships.drink]
//! resource_name = "drink"
//! reference_field = "favorite_drink_id"
//! ```

use anyhow::Context;
use hasura_admin_sdk::{PropertyPolicy, Relationship};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_PK_PROPERTY: &str = "id";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub policy: PropertyPolicy,
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_pk_property")]
    pub pk_property: String,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
}

fn default_pk_property() -> String {
    DEFAULT_PK_PROPERTY.to_string()
}

impl ResourceEntry {
    /// Entry for a table the config does not mention.
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            parent: None,
            pk_property: default_pk_property(),
            relationships: BTreeMap::new(),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.id.trim().is_empty() {
            anyhow::bail!("Resource id cannot be empty");
        }
        if self.pk_property.trim().is_empty() {
            anyhow::bail!("Resource '{}' has an empty pk_property", self.id);
        }
        for (field, rel) in &self.relationships {
            if rel.reference_field.trim().is_empty() || rel.resource_name.trim().is_empty() {
                anyhow::bail!(
                    "Relationship '{}' of '{}' needs resource_name and reference_field",
                    field,
                    self.id
                );
            }
        }
        Ok(())
    }
}

impl ResourcesConfig {
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: ResourcesConfig = toml::from_str(contents)?;
        for entry in &config.resources {
            entry.validate()?;
        }
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Configured entry for `id`, or a bare one keyed on `id`.
    pub fn entry(&self, id: &str) -> ResourceEntry {
        self.resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap_or_else(|| ResourceEntry::bare(id))
    }
}
