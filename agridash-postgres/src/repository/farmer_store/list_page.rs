use sqlx::{Postgres, QueryBuilder, Row};

use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::identity_store::{ListFilter, SortField, SortOrder};
use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::StoreError;

use super::repo_impl::{FarmerStoreImpl, FARMER_COLUMNS};
use crate::utils::{like_pattern, TryFromRow};

/// Append the identity-level filter conditions. The derived filters
/// (engagement, attention) never reach this query.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListFilter) {
    builder.push(" WHERE TRUE");
    if let Some(is_active) = filter.is_active {
        builder.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(region) = &filter.region {
        builder.push(" AND location ILIKE ").push_bind(like_pattern(region));
    }
}

impl FarmerStoreImpl {
    pub(super) async fn list_page_impl(
        repo: &FarmerStoreImpl,
        filter: &ListFilter,
        sort: SortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<FarmerModel>, StoreError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {FARMER_COLUMNS} FROM farmers"));
        push_filter(&mut builder, filter);

        // sort column and direction come from whitelisted enums, never from
        // caller strings
        builder
            .push(" ORDER BY ")
            .push(sort.identity_column())
            .push(" ")
            .push(order.sql())
            .push(", id");
        builder
            .push(" LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset as i64);

        let rows = builder.build().fetch_all(repo.pool.as_ref()).await?;
        rows.iter().map(FarmerModel::try_from_row).collect()
    }

    pub(super) async fn count_impl(
        repo: &FarmerStoreImpl,
        filter: &ListFilter,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS total FROM farmers");
        push_filter(&mut builder, filter);

        let row = builder.build().fetch_one(repo.pool.as_ref()).await?;
        let total: i64 = row.try_get("total")?;
        Ok(total as u64)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::farmer_store::FarmerStoreImpl;
    use crate::test_helper::{insert_farmer, setup_test_pool, test_farmer};
    use agridash_db::repository::identity_store::{
        IdentityStore, ListFilter, SortField, SortOrder,
    };
    use agridash_db::repository::pagination::PageRequest;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
    #[serial_test::serial]
    async fn test_list_page_filters_and_counts(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pool = setup_test_pool().await?;
        let store = FarmerStoreImpl::new(pool.clone());

        // region labels unique to this test; clear leftovers from earlier
        // runs so the counts stay deterministic
        sqlx::query("DELETE FROM farmers WHERE location LIKE 'pgtest-%'")
            .execute(pool.as_ref())
            .await?;
        for i in 0..12 {
            let farmer = test_farmer(
                &format!("Paging Farmer {i:02}"),
                Some(if i % 2 == 0 { "pgtest-east" } else { "pgtest-west" }),
                i != 0,
            );
            insert_farmer(pool.as_ref(), &farmer).await?;
        }

        let filter = ListFilter {
            is_active: Some(true),
            region: Some("pgtest-east".to_string()),
        };
        let total = store.count(&filter).await?;
        assert_eq!(total, 5);

        let page = store
            .list_page(
                &filter,
                SortField::Name,
                SortOrder::Asc,
                PageRequest::for_page(3, 1),
            )
            .await?;
        assert_eq!(page.len(), 3);
        let names: Vec<String> = page
            .iter()
            .map(|f| f.name.as_deref().unwrap_or("").to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let last_page = store
            .list_page(
                &filter,
                SortField::Name,
                SortOrder::Asc,
                PageRequest::for_page(3, 2),
            )
            .await?;
        assert_eq!(last_page.len(), 2);

        Ok(())
    }
}
