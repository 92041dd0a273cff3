use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// One append-only activity log entry. Every service writes its own entries
/// (`action` + `service` tag pairs); the dashboard core only counts and
/// scans them. Retention/deletion is handled outside this codebase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLogModel {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Action tag, e.g. `login`, `create_expense`, `predict`
    pub action: HeaplessString<50>,

    /// Originating service tag, e.g. `auth`, `expense_tracking`
    pub service: HeaplessString<50>,

    pub occurred_at: DateTime<Utc>,

    /// Free-form detail payload supplied by the originating service
    pub details: Option<serde_json::Value>,

    pub ip_address: Option<HeaplessString<45>>,

    pub user_agent: Option<HeaplessString<200>>,
}

impl Identifiable for ActivityLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
