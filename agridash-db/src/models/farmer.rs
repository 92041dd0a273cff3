use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Farmer identity record, owned by the external user-management service.
/// The dashboard core reads this collection; it never creates, updates or
/// deletes rows in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FarmerModel {
    pub id: Uuid,

    /// Primary contact number, unique per account
    pub phone_number: HeaplessString<20>,

    /// Display name, missing for accounts registered by phone only
    pub name: Option<HeaplessString<100>>,

    /// Free-form region/locality label used for regional grouping
    pub location: Option<HeaplessString<100>>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Identifiable for FarmerModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
