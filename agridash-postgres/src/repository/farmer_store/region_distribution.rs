use std::collections::HashMap;

use sqlx::Row;

use agridash_db::repository::StoreError;

use super::repo_impl::FarmerStoreImpl;

impl FarmerStoreImpl {
    /// Farmer count per location label; rows with no location group under
    /// `Unknown`.
    pub(super) async fn region_distribution_impl(
        repo: &FarmerStoreImpl,
    ) -> Result<HashMap<String, u64>, StoreError> {
        let rows = sqlx::query(
            "SELECT COALESCE(location, 'Unknown') AS region, COUNT(*) AS farmers \
             FROM farmers \
             GROUP BY COALESCE(location, 'Unknown')",
        )
        .fetch_all(repo.pool.as_ref())
        .await?;

        let mut distribution = HashMap::with_capacity(rows.len());
        for row in rows {
            let region: String = row.try_get("region")?;
            let farmers: i64 = row.try_get("farmers")?;
            distribution.insert(region, farmers as u64);
        }
        Ok(distribution)
    }
}
