use async_trait::async_trait;
use uuid::Uuid;

use crate::models::assessment::AssessmentRollup;
use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the financial-assessment collection.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Batch-level group-by: profit sum, row count and the two indicator
    /// averages per user. Users without matching records have no row.
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<AssessmentRollup>, StoreError>;
}
