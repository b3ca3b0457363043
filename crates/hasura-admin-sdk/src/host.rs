//! Contract between the adapter and the admin-panel host framework.
//!
//! The host renders lists, forms and filters from a [`BaseResource`] and its
//! [`BaseProperty`] values, and never looks behind them.

use async_trait::async_trait;

use crate::error::HasuraError;
use crate::querying::{Filter, FindOptions};
use crate::record::{Params, Record};
use crate::type_mapping::PropertyType;

/// One field of a resource, as the host sees it.
pub trait BaseProperty {
    /// Field path, used as the record parameter key.
    fn name(&self) -> &str;

    /// UI type tag.
    fn property_type(&self) -> PropertyType;

    fn is_array(&self) -> bool;

    fn is_required(&self) -> bool;

    fn is_id(&self) -> bool;

    /// Whether the host may render an input for this field.
    fn is_editable(&self) -> bool;

    fn is_visible(&self) -> bool;

    /// Only text and numbers can be ordered by the host's list view.
    fn is_sortable(&self) -> bool {
        matches!(
            self.property_type(),
            PropertyType::String | PropertyType::Number
        )
    }

    /// Name of the referenced resource for `reference` properties.
    fn reference(&self) -> Option<&str>;

    /// Enumerated values offered in a select box. No enum support yet.
    fn available_values(&self) -> Option<Vec<String>> {
        None
    }

    fn sub_properties(&self) -> Vec<Self>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// One queryable and mutable collection.
///
/// Each operation is a single round-trip; errors are returned to the caller
/// unchanged.
#[async_trait]
pub trait BaseResource: Send + Sync {
    type Property: BaseProperty + Send;

    fn id(&self) -> &str;

    fn name(&self) -> &str {
        self.id()
    }

    /// Grouping label shown in the host's navigation.
    fn database_name(&self) -> &str;

    fn database_type(&self) -> &str;

    fn properties(&self) -> Vec<Self::Property>;

    fn property(&self, name: &str) -> Option<Self::Property> {
        self.properties().into_iter().find(|p| p.name() == name)
    }

    async fn count(&self, filters: &[Filter]) -> Result<u64, HasuraError>;

    async fn find(
        &self,
        filters: &[Filter],
        options: FindOptions,
    ) -> Result<Vec<Record>, HasuraError>;

    async fn find_one(&self, id: &str) -> Result<Record, HasuraError>;

    /// Records for `ids`, in whatever order the backend returns them.
    async fn find_many(&self, ids: &[String]) -> Result<Vec<Record>, HasuraError>;

    async fn create(&self, params: Params) -> Result<Record, HasuraError>;

    async fn update(&self, id: &str, params: Params) -> Result<Record, HasuraError>;

    async fn delete(&self, id: &str) -> Result<(), HasuraError>;
}
