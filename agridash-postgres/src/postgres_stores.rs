use sqlx::PgPool;
use std::sync::Arc;

use agridash_api::service::orchestrator::MetricsStores;
use agridash_db::repository::identity_store::IdentityStore;

use crate::repository::{
    ActivityLogStoreImpl, AssessmentStoreImpl, ExpenseStoreImpl, FarmerStoreImpl, HealthStoreImpl,
    PredictionStoreImpl, RecommendationStoreImpl,
};

/// Factory wiring every store implementation to one shared pool.
///
/// All stores are read-only, so they share the pool directly; no
/// transaction/unit-of-work machinery is involved.
pub struct PostgresStores {
    pool: Arc<PgPool>,
}

impl PostgresStores {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn identity_store(&self) -> Arc<dyn IdentityStore> {
        Arc::new(FarmerStoreImpl::new(self.pool.clone()))
    }

    /// The store bundle the metrics orchestrator fans out over.
    pub fn metrics_stores(&self) -> MetricsStores {
        MetricsStores {
            activity: Arc::new(ActivityLogStoreImpl::new(self.pool.clone())),
            expenses: Arc::new(ExpenseStoreImpl::new(self.pool.clone())),
            assessments: Arc::new(AssessmentStoreImpl::new(self.pool.clone())),
            predictions: Arc::new(PredictionStoreImpl::new(self.pool.clone())),
            health: Arc::new(HealthStoreImpl::new(self.pool.clone())),
            recommendations: Arc::new(RecommendationStoreImpl::new(self.pool.clone())),
        }
    }
}
