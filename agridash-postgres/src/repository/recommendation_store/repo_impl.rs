use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agridash_db::repository::recommendation_store::RecommendationStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

pub struct RecommendationStoreImpl {
    pub pool: Arc<PgPool>,
}

impl RecommendationStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for RecommendationStoreImpl {
    async fn loan_advice_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        Self::counts_impl(self, "loan_advice", users, window).await
    }

    async fn cost_cutting_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        Self::counts_impl(self, "cost_cutting_strategies", users, window).await
    }

    async fn latest_loan_advice(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        Self::latest_impl(self, "loan_advice", users).await
    }

    async fn latest_cost_cutting(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        Self::latest_impl(self, "cost_cutting_strategies", users).await
    }
}
