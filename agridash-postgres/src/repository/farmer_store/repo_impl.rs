use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::identity_store::{IdentityStore, ListFilter, SortField, SortOrder};
use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::StoreError;

use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

/// Columns every farmer query selects, in [`TryFromRow`] order.
pub(super) const FARMER_COLUMNS: &str =
    "id, phone_number, name, location, is_active, created_at";

pub struct FarmerStoreImpl {
    pub pool: Arc<PgPool>,
}

impl FarmerStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for FarmerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(FarmerModel {
            id: row.get("id"),
            phone_number: get_heapless_string(row, "phone_number")?,
            name: get_optional_heapless_string(row, "name")?,
            location: get_optional_heapless_string(row, "location")?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl IdentityStore for FarmerStoreImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FarmerModel>, StoreError> {
        Self::find_by_id_impl(self, id).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<FarmerModel>, StoreError> {
        Self::search_impl(self, query, limit).await
    }

    async fn list_page(
        &self,
        filter: &ListFilter,
        sort: SortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<FarmerModel>, StoreError> {
        Self::list_page_impl(self, filter, sort, order, page).await
    }

    async fn count(&self, filter: &ListFilter) -> Result<u64, StoreError> {
        Self::count_impl(self, filter).await
    }

    async fn list_ids(&self, page: PageRequest) -> Result<Vec<Uuid>, StoreError> {
        Self::list_ids_impl(self, page).await
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        Self::count_all_impl(self).await
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        Self::count_active_impl(self).await
    }

    async fn region_distribution(&self) -> Result<HashMap<String, u64>, StoreError> {
        Self::region_distribution_impl(self).await
    }
}
