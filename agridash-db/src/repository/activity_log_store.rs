use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repository::time_window::TimeWindow;
use crate::repository::StoreError;

/// Read-side contract over the activity log collection.
///
/// The append path belongs to the originating services; this core only
/// counts and scans.
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    /// Login-action counts per user within the window, grouped at the query
    /// level. Users without matching entries have no row in the result.
    async fn login_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError>;

    /// Most recent login timestamp per user, unbounded by any window.
    ///
    /// Kept window-free on purpose: "last login ever" stays visible even
    /// when the reporting window excludes every login.
    async fn last_logins(&self, users: &[Uuid]) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError>;
}
