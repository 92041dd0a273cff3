use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the two recommendation collections.
///
/// Counts are windowed; the latest timestamps are not. The asymmetry
/// mirrors the auth contract (`last_logins`) so "last recommendation ever"
/// survives a narrow reporting window.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn loan_advice_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError>;

    async fn cost_cutting_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError>;

    async fn latest_loan_advice(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError>;

    async fn latest_cost_cutting(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError>;
}
