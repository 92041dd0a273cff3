use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::farmer::FarmerModel;
use crate::repository::pagination::PageRequest;
use crate::repository::StoreError;

/// Identity-level filter pushed down to the farmer collection query.
///
/// Only fields that exist on the identity record belong here; filters over
/// derived metrics are applied after aggregation by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on the location field
    pub region: Option<String>,
}

/// Whitelisted sort keys for the farmer listing.
///
/// `LastActivity` is the default. The identity collection has no activity
/// column, so it sorts by `created_at` as the recency proxy;
/// `EngagementScore` cannot be resolved at the identity query either and is
/// applied to the fetched page after metrics computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    LastActivity,
    CreatedAt,
    Name,
    EngagementScore,
}

impl SortField {
    /// Parse a sort-field name, falling back to the default on unknown input.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "created_at" => SortField::CreatedAt,
            "name" => SortField::Name,
            "engagement_score" => SortField::EngagementScore,
            _ => SortField::LastActivity,
        }
    }

    /// Column used at the identity-level query for this sort key.
    pub fn identity_column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            // created_at doubles as the recency proxy; engagement is sorted
            // client-side after computation.
            SortField::LastActivity | SortField::CreatedAt | SortField::EngagementScore => {
                "created_at"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Read-side contract over the farmer identity collection.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch one farmer by id; `None` when the id is unknown.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FarmerModel>, StoreError>;

    /// Case-insensitive substring search on name or phone number.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<FarmerModel>, StoreError>;

    /// One page of farmers under the given filter and sort.
    async fn list_page(
        &self,
        filter: &ListFilter,
        sort: SortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<FarmerModel>, StoreError>;

    /// Number of farmers matching the filter, ignoring pagination.
    async fn count(&self, filter: &ListFilter) -> Result<u64, StoreError>;

    /// Ids of all farmers in a stable order, for batched population sweeps.
    async fn list_ids(&self, page: PageRequest) -> Result<Vec<Uuid>, StoreError>;

    async fn count_all(&self) -> Result<u64, StoreError>;

    async fn count_active(&self) -> Result<u64, StoreError>;

    /// Farmer count per location label; missing locations group under `Unknown`.
    async fn region_distribution(&self) -> Result<HashMap<String, u64>, StoreError>;
}
