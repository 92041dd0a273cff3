use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agridash_db::repository::activity_log_store::ActivityLogStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

pub struct ActivityLogStoreImpl {
    pub pool: Arc<PgPool>,
}

impl ActivityLogStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogStore for ActivityLogStoreImpl {
    async fn login_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        Self::login_counts_impl(self, users, window).await
    }

    async fn last_logins(&self, users: &[Uuid]) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        Self::last_logins_impl(self, users).await
    }
}
