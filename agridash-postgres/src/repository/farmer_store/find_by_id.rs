use uuid::Uuid;

use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::StoreError;

use super::repo_impl::{FarmerStoreImpl, FARMER_COLUMNS};
use crate::utils::TryFromRow;

impl FarmerStoreImpl {
    pub(super) async fn find_by_id_impl(
        repo: &FarmerStoreImpl,
        id: Uuid,
    ) -> Result<Option<FarmerModel>, StoreError> {
        let query = format!("SELECT {FARMER_COLUMNS} FROM farmers WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(repo.pool.as_ref())
            .await?;

        row.map(|row| FarmerModel::try_from_row(&row)).transpose()
    }
}
