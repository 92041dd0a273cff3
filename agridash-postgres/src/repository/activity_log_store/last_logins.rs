use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use agridash_db::repository::StoreError;

use super::repo_impl::ActivityLogStoreImpl;

const LAST_LOGINS: &str = "SELECT user_id, MAX(occurred_at) AS last_login \
     FROM activity_logs \
     WHERE user_id = ANY($1) AND action = 'login' \
     GROUP BY user_id";

impl ActivityLogStoreImpl {
    /// Most recent login per user. Deliberately unbounded by any window.
    pub(super) async fn last_logins_impl(
        repo: &ActivityLogStoreImpl,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(LAST_LOGINS)
            .bind(users)
            .fetch_all(repo.pool.as_ref())
            .await?;

        let mut last = Vec::with_capacity(rows.len());
        for row in rows {
            last.push((row.try_get("user_id")?, row.try_get("last_login")?));
        }
        Ok(last)
    }
}
