pub mod db_init;

pub mod activity_log_store;
pub mod assessment_store;
pub mod expense_store;
pub mod farmer_store;
pub mod health_store;
pub mod prediction_store;
pub mod recommendation_store;

pub use activity_log_store::ActivityLogStoreImpl;
pub use assessment_store::AssessmentStoreImpl;
pub use expense_store::ExpenseStoreImpl;
pub use farmer_store::FarmerStoreImpl;
pub use health_store::HealthStoreImpl;
pub use prediction_store::PredictionStoreImpl;
pub use recommendation_store::RecommendationStoreImpl;
