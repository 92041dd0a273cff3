use uuid::Uuid;

/// Entities that carry a unique identifier.
///
/// Every source-collection model implements this so generic code (batch
/// merges, fixture helpers) can key rows by id without knowing the concrete
/// record type.
pub trait Identifiable {
    fn get_id(&self) -> Uuid;
}
