use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use agridash_db::models::health_assessment::HealthRollup;
use agridash_db::repository::health_store::HealthAssessmentStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

pub struct HealthStoreImpl {
    pub pool: Arc<PgPool>,
}

impl HealthStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthAssessmentStore for HealthStoreImpl {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<HealthRollup>, StoreError> {
        Self::rollup_by_user_impl(self, users, window).await
    }
}
