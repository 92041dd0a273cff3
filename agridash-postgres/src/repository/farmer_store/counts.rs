use sqlx::Row;
use uuid::Uuid;

use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::StoreError;

use super::repo_impl::FarmerStoreImpl;

impl FarmerStoreImpl {
    pub(super) async fn count_all_impl(repo: &FarmerStoreImpl) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM farmers")
            .fetch_one(repo.pool.as_ref())
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total as u64)
    }

    pub(super) async fn count_active_impl(repo: &FarmerStoreImpl) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM farmers WHERE is_active")
            .fetch_one(repo.pool.as_ref())
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total as u64)
    }

    /// Stable-ordered id listing used by the summary's population sweep.
    pub(super) async fn list_ids_impl(
        repo: &FarmerStoreImpl,
        page: PageRequest,
    ) -> Result<Vec<Uuid>, StoreError> {
        let rows = sqlx::query(
            "SELECT id FROM farmers ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(repo.pool.as_ref())
        .await?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }
}
