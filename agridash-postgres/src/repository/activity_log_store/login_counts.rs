use sqlx::Row;
use uuid::Uuid;

use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::ActivityLogStoreImpl;

const WINDOWED: &str = "SELECT user_id, COUNT(*) AS logins \
     FROM activity_logs \
     WHERE user_id = ANY($1) AND action = 'login' AND occurred_at >= $2 \
     GROUP BY user_id";

const UNBOUNDED: &str = "SELECT user_id, COUNT(*) AS logins \
     FROM activity_logs \
     WHERE user_id = ANY($1) AND action = 'login' \
     GROUP BY user_id";

impl ActivityLogStoreImpl {
    /// Windowed login counts, one grouped query for the whole batch.
    pub(super) async fn login_counts_impl(
        repo: &ActivityLogStoreImpl,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
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

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            counts.push((row.try_get("user_id")?, row.try_get("logins")?));
        }
        Ok(counts)
    }
}
