pub mod pagination;
pub mod time_window;

pub mod activity_log_store;
pub mod assessment_store;
pub mod expense_store;
pub mod health_store;
pub mod identity_store;
pub mod prediction_store;
pub mod recommendation_store;

// Re-exports
pub use pagination::*;
pub use time_window::*;

pub use activity_log_store::*;
pub use assessment_store::*;
pub use expense_store::*;
pub use health_store::*;
pub use identity_store::*;
pub use prediction_store::*;
pub use recommendation_store::*;

/// Error type shared by all store contracts.
///
/// Store implementations surface their driver errors unchanged; the service
/// layer decides whether to degrade or propagate.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;
