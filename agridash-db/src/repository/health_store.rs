use async_trait::async_trait;
use uuid::Uuid;

use crate::models::health_assessment::HealthRollup;
use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the health-assessment collection.
#[async_trait]
pub trait HealthAssessmentStore: Send + Sync {
    /// Batch-level group-by with per-record derived revenue/profit summed
    /// in the query. Users without matching records have no row.
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<HealthRollup>, StoreError>;
}
