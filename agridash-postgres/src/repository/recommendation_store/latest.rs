use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use agridash_db::repository::StoreError;

use super::repo_impl::RecommendationStoreImpl;

impl RecommendationStoreImpl {
    /// Most recent record per user, unbounded by any window, over one of
    /// the two recommendation tables.
    pub(super) async fn latest_impl(
        repo: &RecommendationStoreImpl,
        table: &'static str,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT user_id, MAX(recorded_at) AS latest FROM {table} \
             WHERE user_id = ANY($1) \
             GROUP BY user_id"
        );
        let rows = sqlx::query(&sql)
            .bind(users)
            .fetch_all(repo.pool.as_ref())
            .await?;

        let mut latest = Vec::with_capacity(rows.len());
        for row in rows {
            latest.push((row.try_get("user_id")?, row.try_get("latest")?));
        }
        Ok(latest)
    }
}
