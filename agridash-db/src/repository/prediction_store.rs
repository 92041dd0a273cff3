use async_trait::async_trait;
use uuid::Uuid;

use crate::models::prediction::PredictionModel;
use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the forecasting-query collection.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Raw matched records for the given users, oldest first.
    ///
    /// Returns whole records rather than a rollup because the consumer
    /// needs the per-record region/crop lists for flattening and for the
    /// first-region/first-crop frequency key.
    async fn find_by_users(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<PredictionModel>, StoreError>;
}
