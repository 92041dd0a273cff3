use async_trait::async_trait;
use uuid::Uuid;

use crate::models::expense::ExpenseRollup;
use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the expense collection.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Batch-level group-by over the given users: sums, counts, the pushed
    /// goods tags and the most recent entry date per user. Users without
    /// matching records have no row in the result.
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<ExpenseRollup>, StoreError>;
}
