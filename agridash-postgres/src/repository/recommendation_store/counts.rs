use sqlx::Row;
use uuid::Uuid;

use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::RecommendationStoreImpl;

impl RecommendationStoreImpl {
    /// Windowed per-user counts over one of the two recommendation tables.
    /// `table` is a compile-time constant supplied by the trait methods,
    /// never caller input.
    pub(super) async fn counts_impl(
        repo: &RecommendationStoreImpl,
        table: &'static str,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let rows = match window.since {
            Some(since) => {
                let sql = format!(
                    "SELECT user_id, COUNT(*) AS entries FROM {table} \
                     WHERE user_id = ANY($1) AND recorded_at >= $2 \
                     GROUP BY user_id"
                );
                sqlx::query(&sql)
                    .bind(users)
                    .bind(since)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT user_id, COUNT(*) AS entries FROM {table} \
                     WHERE user_id = ANY($1) \
                     GROUP BY user_id"
                );
                sqlx::query(&sql)
                    .bind(users)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
        };

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            counts.push((row.try_get("user_id")?, row.try_get("entries")?));
        }
        Ok(counts)
    }
}
