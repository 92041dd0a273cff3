use uuid::Uuid;

use agridash_db::models::prediction::PredictionModel;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::PredictionStoreImpl;
use crate::utils::TryFromRow;

const WINDOWED: &str = "SELECT id, user_id, recorded_at, regions, crop_names \
     FROM predictions \
     WHERE user_id = ANY($1) AND recorded_at >= $2 \
     ORDER BY recorded_at, id";

const UNBOUNDED: &str = "SELECT id, user_id, recorded_at, regions, crop_names \
     FROM predictions \
     WHERE user_id = ANY($1) \
     ORDER BY recorded_at, id";

impl PredictionStoreImpl {
    /// Raw matched records, oldest first. The consumer flattens the
    /// list-valued fields and builds the frequency table.
    pub(super) async fn find_by_users_impl(
        repo: &PredictionStoreImpl,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<PredictionModel>, StoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let rows = match window.since {
            Some(since) => {
                sqlx::query(WINDOWED)
                    .bind(users)
                    .bind(since)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
            None => {
                sqlx::query(UNBOUNDED)
                    .bind(users)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
        };

        rows.iter().map(PredictionModel::try_from_row).collect()
    }
}
