use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::StoreError;

use super::repo_impl::{FarmerStoreImpl, FARMER_COLUMNS};
use crate::utils::{like_pattern, TryFromRow};

impl FarmerStoreImpl {
    pub(super) async fn search_impl(
        repo: &FarmerStoreImpl,
        query: &str,
        limit: usize,
    ) -> Result<Vec<FarmerModel>, StoreError> {
        let sql = format!(
            "SELECT {FARMER_COLUMNS} FROM farmers \
             WHERE name ILIKE $1 OR phone_number ILIKE $1 \
             ORDER BY name NULLS LAST, id \
             LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .bind(limit as i64)
            .fetch_all(repo.pool.as_ref())
            .await?;

        rows.iter().map(FarmerModel::try_from_row).collect()
    }
}
