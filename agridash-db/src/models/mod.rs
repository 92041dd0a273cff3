pub mod identifiable;

pub mod activity_log;
pub mod assessment;
pub mod expense;
pub mod farmer;
pub mod health_assessment;
pub mod prediction;
pub mod recommendation;

// Re-exports
pub use identifiable::*;

pub use activity_log::*;
pub use assessment::*;
pub use expense::*;
pub use farmer::*;
pub use health_assessment::*;
pub use prediction::*;
pub use recommendation::*;
