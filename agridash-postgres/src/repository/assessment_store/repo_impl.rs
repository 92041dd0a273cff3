use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use agridash_db::models::assessment::AssessmentRollup;
use agridash_db::repository::assessment_store::AssessmentStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

pub struct AssessmentStoreImpl {
    pub pool: Arc<PgPool>,
}

impl AssessmentStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for AssessmentStoreImpl {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<AssessmentRollup>, StoreError> {
        Self::rollup_by_user_impl(self, users, window).await
    }
}
