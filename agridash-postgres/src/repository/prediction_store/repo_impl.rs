use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use agridash_db::models::prediction::PredictionModel;
use agridash_db::repository::prediction_store::PredictionStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use crate::utils::TryFromRow;

pub struct PredictionStoreImpl {
    pub pool: Arc<PgPool>,
}

impl PredictionStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for PredictionModel {
    fn try_from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(PredictionModel {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            recorded_at: row.try_get("recorded_at")?,
            regions: row.try_get("regions")?,
            crop_names: row.try_get("crop_names")?,
        })
    }
}

#[async_trait]
impl PredictionStore for PredictionStoreImpl {
    async fn find_by_users(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<PredictionModel>, StoreError> {
        Self::find_by_users_impl(self, users, window).await
    }
}
