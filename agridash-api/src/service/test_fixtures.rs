//! In-memory fake stores and fixture builders for service-layer tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use uuid::Uuid;

use agridash_db::models::activity_log::ActivityLogModel;
use agridash_db::models::assessment::{AssessmentModel, AssessmentRollup};
use agridash_db::models::expense::{ExpenseModel, ExpenseRollup};
use agridash_db::models::farmer::FarmerModel;
use agridash_db::models::health_assessment::{HealthAssessmentModel, HealthRollup};
use agridash_db::models::identifiable::Identifiable;
use agridash_db::models::prediction::PredictionModel;
use agridash_db::models::recommendation::{CostCuttingModel, LoanAdviceModel};
use agridash_db::repository::activity_log_store::ActivityLogStore;
use agridash_db::repository::assessment_store::AssessmentStore;
use agridash_db::repository::expense_store::ExpenseStore;
use agridash_db::repository::health_store::HealthAssessmentStore;
use agridash_db::repository::identity_store::{IdentityStore, ListFilter, SortField, SortOrder};
use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::prediction_store::PredictionStore;
use agridash_db::repository::recommendation_store::RecommendationStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use crate::service::orchestrator::MetricsStores;

static PHONE_COUNTER: AtomicU64 = AtomicU64::new(0);

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

pub fn create_test_farmer(
    name: &str,
    location: Option<&str>,
    is_active: bool,
    created_at: DateTime<Utc>,
) -> FarmerModel {
    let n = PHONE_COUNTER.fetch_add(1, Ordering::Relaxed);
    FarmerModel {
        id: Uuid::new_v4(),
        phone_number: HeaplessString::try_from(format!("+2519{n:08}").as_str()).unwrap(),
        name: Some(HeaplessString::try_from(name).unwrap()),
        location: location.map(|l| HeaplessString::try_from(l).unwrap()),
        is_active,
        created_at,
    }
}

pub fn create_test_login(user_id: Uuid, occurred_at: DateTime<Utc>) -> ActivityLogModel {
    ActivityLogModel {
        id: Uuid::new_v4(),
        user_id,
        action: HeaplessString::try_from("login").unwrap(),
        service: HeaplessString::try_from("auth").unwrap(),
        occurred_at,
        details: None,
        ip_address: None,
        user_agent: None,
    }
}

pub fn create_test_expense(
    user_id: Uuid,
    entry_date: DateTime<Utc>,
    goods: &str,
    price_etb: f64,
) -> ExpenseModel {
    ExpenseModel {
        id: Uuid::new_v4(),
        user_id,
        entry_date,
        goods: HeaplessString::try_from(goods).unwrap(),
        price_etb,
    }
}

pub fn create_test_assessment(
    user_id: Uuid,
    entry_date: DateTime<Utc>,
    profit: f64,
    financial_stability: f64,
    cash_flow: f64,
) -> AssessmentModel {
    AssessmentModel {
        id: Uuid::new_v4(),
        user_id,
        entry_date,
        profit,
        financial_stability,
        cash_flow,
    }
}

pub fn create_test_prediction(
    user_id: Uuid,
    recorded_at: DateTime<Utc>,
    regions: &[&str],
    crop_names: &[&str],
) -> PredictionModel {
    PredictionModel {
        id: Uuid::new_v4(),
        user_id,
        recorded_at,
        regions: regions.iter().map(|r| r.to_string()).collect(),
        crop_names: crop_names.iter().map(|c| c.to_string()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn create_test_health(
    user_id: Uuid,
    recorded_at: DateTime<Utc>,
    crop_type: &str,
    sale_price_per_quintal: f64,
    quantity_sold: f64,
    total_cost: f64,
    government_subsidy: f64,
) -> HealthAssessmentModel {
    HealthAssessmentModel {
        id: Uuid::new_v4(),
        user_id,
        recorded_at,
        crop_type: HeaplessString::try_from(crop_type).unwrap(),
        sale_price_per_quintal,
        quantity_sold,
        total_cost,
        government_subsidy,
    }
}

pub fn create_test_loan_advice(user_id: Uuid, recorded_at: DateTime<Utc>) -> LoanAdviceModel {
    LoanAdviceModel {
        id: Uuid::new_v4(),
        user_id,
        recorded_at,
        advice: HeaplessString::try_from("Consider a seasonal input loan").unwrap(),
    }
}

pub fn create_test_cost_cutting(user_id: Uuid, recorded_at: DateTime<Utc>) -> CostCuttingModel {
    CostCuttingModel {
        id: Uuid::new_v4(),
        user_id,
        recorded_at,
        strategy: HeaplessString::try_from("Buy fertilizer through the cooperative").unwrap(),
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Raw fixture collections behind [`FakeStore`].
#[derive(Debug, Default)]
pub struct FakeData {
    pub farmers: Vec<FarmerModel>,
    pub logs: Vec<ActivityLogModel>,
    pub expenses: Vec<ExpenseModel>,
    pub assessments: Vec<AssessmentModel>,
    pub predictions: Vec<PredictionModel>,
    pub health: Vec<HealthAssessmentModel>,
    pub loan_advice: Vec<LoanAdviceModel>,
    pub cost_cutting: Vec<CostCuttingModel>,
}

/// One in-memory implementation of every store contract, computing the same
/// group-by results the SQL implementations produce.
pub struct FakeStore {
    data: FakeData,
}

impl FakeStore {
    pub fn new(data: FakeData) -> Self {
        Self { data }
    }

    /// Bundle this store for every metric category.
    pub fn metrics_stores(self: &Arc<Self>) -> MetricsStores {
        MetricsStores {
            activity: self.clone(),
            expenses: self.clone(),
            assessments: self.clone(),
            predictions: self.clone(),
            health: self.clone(),
            recommendations: self.clone(),
        }
    }
}

fn matches_region(farmer: &FarmerModel, region: &str) -> bool {
    farmer
        .location
        .as_ref()
        .is_some_and(|location| location.to_lowercase().contains(&region.to_lowercase()))
}

fn matches_filter(farmer: &FarmerModel, filter: &ListFilter) -> bool {
    if let Some(active) = filter.is_active {
        if farmer.is_active != active {
            return false;
        }
    }
    if let Some(region) = &filter.region {
        if !matches_region(farmer, region) {
            return false;
        }
    }
    true
}

#[async_trait]
impl IdentityStore for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FarmerModel>, StoreError> {
        Ok(self.data.farmers.iter().find(|f| f.get_id() == id).cloned())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<FarmerModel>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .data
            .farmers
            .iter()
            .filter(|f| {
                f.name
                    .as_ref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || f.phone_number.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_page(
        &self,
        filter: &ListFilter,
        sort: SortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<FarmerModel>, StoreError> {
        let mut matched: Vec<FarmerModel> = self
            .data
            .farmers
            .iter()
            .filter(|f| matches_filter(f, filter))
            .cloned()
            .collect();
        match sort.identity_column() {
            "name" => matched.sort_by(|a, b| {
                a.name
                    .as_deref()
                    .unwrap_or("")
                    .cmp(b.name.as_deref().unwrap_or(""))
            }),
            _ => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
        }
        if order == SortOrder::Desc {
            matched.reverse();
        }
        Ok(matched
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    async fn count(&self, filter: &ListFilter) -> Result<u64, StoreError> {
        Ok(self
            .data
            .farmers
            .iter()
            .filter(|f| matches_filter(f, filter))
            .count() as u64)
    }

    async fn list_ids(&self, page: PageRequest) -> Result<Vec<Uuid>, StoreError> {
        let mut farmers: Vec<&FarmerModel> = self.data.farmers.iter().collect();
        farmers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(farmers
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|f| f.id)
            .collect())
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        Ok(self.data.farmers.len() as u64)
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        Ok(self.data.farmers.iter().filter(|f| f.is_active).count() as u64)
    }

    async fn region_distribution(&self) -> Result<HashMap<String, u64>, StoreError> {
        let mut distribution: HashMap<String, u64> = HashMap::new();
        for farmer in &self.data.farmers {
            let region = farmer
                .location
                .as_ref()
                .map_or_else(|| "Unknown".to_string(), |l| l.to_string());
            *distribution.entry(region).or_insert(0) += 1;
        }
        Ok(distribution)
    }
}

#[async_trait]
impl ActivityLogStore for FakeStore {
    async fn login_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for log in &self.data.logs {
            if users.contains(&log.user_id)
                && log.action.as_str() == "login"
                && window.contains(log.occurred_at)
            {
                *counts.entry(log.user_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn last_logins(&self, users: &[Uuid]) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        let mut last: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for log in &self.data.logs {
            if users.contains(&log.user_id) && log.action.as_str() == "login" {
                let entry = last.entry(log.user_id).or_insert(log.occurred_at);
                if log.occurred_at > *entry {
                    *entry = log.occurred_at;
                }
            }
        }
        Ok(last.into_iter().collect())
    }
}

#[async_trait]
impl ExpenseStore for FakeStore {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<ExpenseRollup>, StoreError> {
        let mut groups: HashMap<Uuid, Vec<&ExpenseModel>> = HashMap::new();
        for expense in &self.data.expenses {
            if users.contains(&expense.user_id) && window.contains(expense.entry_date) {
                groups.entry(expense.user_id).or_default().push(expense);
            }
        }
        Ok(groups
            .into_iter()
            .map(|(user_id, mut records)| {
                records.sort_by_key(|r| r.entry_date);
                ExpenseRollup {
                    user_id,
                    total_expenses: records.iter().map(|r| r.price_etb).sum(),
                    expense_count: records.len() as i64,
                    goods: records.iter().map(|r| r.goods.to_string()).collect(),
                    last_activity: records.iter().map(|r| r.entry_date).max(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl AssessmentStore for FakeStore {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<AssessmentRollup>, StoreError> {
        let mut groups: HashMap<Uuid, Vec<&AssessmentModel>> = HashMap::new();
        for assessment in &self.data.assessments {
            if users.contains(&assessment.user_id) && window.contains(assessment.entry_date) {
                groups.entry(assessment.user_id).or_default().push(assessment);
            }
        }
        Ok(groups
            .into_iter()
            .map(|(user_id, records)| {
                let count = records.len() as i64;
                let stability: f64 = records.iter().map(|r| r.financial_stability).sum();
                let cash_flow: f64 = records.iter().map(|r| r.cash_flow).sum();
                AssessmentRollup {
                    user_id,
                    total_profit: records.iter().map(|r| r.profit).sum(),
                    assessment_count: count,
                    financial_stability_avg: Some(stability / count as f64),
                    cash_flow_avg: Some(cash_flow / count as f64),
                }
            })
            .collect())
    }
}

#[async_trait]
impl PredictionStore for FakeStore {
    async fn find_by_users(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<PredictionModel>, StoreError> {
        let mut matched: Vec<PredictionModel> = self
            .data
            .predictions
            .iter()
            .filter(|p| users.contains(&p.user_id) && window.contains(p.recorded_at))
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.recorded_at);
        Ok(matched)
    }
}

#[async_trait]
impl HealthAssessmentStore for FakeStore {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<HealthRollup>, StoreError> {
        let mut groups: HashMap<Uuid, Vec<&HealthAssessmentModel>> = HashMap::new();
        for assessment in &self.data.health {
            if users.contains(&assessment.user_id) && window.contains(assessment.recorded_at) {
                groups.entry(assessment.user_id).or_default().push(assessment);
            }
        }
        Ok(groups
            .into_iter()
            .map(|(user_id, records)| {
                let revenue: f64 = records
                    .iter()
                    .map(|r| r.sale_price_per_quintal * r.quantity_sold)
                    .sum();
                let cost: f64 = records.iter().map(|r| r.total_cost).sum();
                let crop_types: BTreeSet<String> =
                    records.iter().map(|r| r.crop_type.to_string()).collect();
                HealthRollup {
                    user_id,
                    total_assessments: records.len() as i64,
                    total_revenue: revenue,
                    total_profit: revenue - cost,
                    total_subsidies: records.iter().map(|r| r.government_subsidy).sum(),
                    crop_types: crop_types.into_iter().collect(),
                    last_assessment: records.iter().map(|r| r.recorded_at).max(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl RecommendationStore for FakeStore {
    async fn loan_advice_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for advice in &self.data.loan_advice {
            if users.contains(&advice.user_id) && window.contains(advice.recorded_at) {
                *counts.entry(advice.user_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn cost_cutting_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for strategy in &self.data.cost_cutting {
            if users.contains(&strategy.user_id) && window.contains(strategy.recorded_at) {
                *counts.entry(strategy.user_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn latest_loan_advice(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        let mut last: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for advice in &self.data.loan_advice {
            if users.contains(&advice.user_id) {
                let entry = last.entry(advice.user_id).or_insert(advice.recorded_at);
                if advice.recorded_at > *entry {
                    *entry = advice.recorded_at;
                }
            }
        }
        Ok(last.into_iter().collect())
    }

    async fn latest_cost_cutting(
        &self,
        users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        let mut last: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for strategy in &self.data.cost_cutting {
            if users.contains(&strategy.user_id) {
                let entry = last.entry(strategy.user_id).or_insert(strategy.recorded_at);
                if strategy.recorded_at > *entry {
                    *entry = strategy.recorded_at;
                }
            }
        }
        Ok(last.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

fn simulated_failure<T>() -> Result<T, StoreError> {
    Err("simulated store failure".into())
}

/// A store whose every call fails, for degradation tests.
pub struct FailingStore;

#[async_trait]
impl IdentityStore for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<FarmerModel>, StoreError> {
        simulated_failure()
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<FarmerModel>, StoreError> {
        simulated_failure()
    }

    async fn list_page(
        &self,
        _filter: &ListFilter,
        _sort: SortField,
        _order: SortOrder,
        _page: PageRequest,
    ) -> Result<Vec<FarmerModel>, StoreError> {
        simulated_failure()
    }

    async fn count(&self, _filter: &ListFilter) -> Result<u64, StoreError> {
        simulated_failure()
    }

    async fn list_ids(&self, _page: PageRequest) -> Result<Vec<Uuid>, StoreError> {
        simulated_failure()
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        simulated_failure()
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        simulated_failure()
    }

    async fn region_distribution(&self) -> Result<HashMap<String, u64>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl ActivityLogStore for FailingStore {
    async fn login_counts(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        simulated_failure()
    }

    async fn last_logins(&self, _users: &[Uuid]) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl ExpenseStore for FailingStore {
    async fn rollup_by_user(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<ExpenseRollup>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl AssessmentStore for FailingStore {
    async fn rollup_by_user(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<AssessmentRollup>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl PredictionStore for FailingStore {
    async fn find_by_users(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<PredictionModel>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl HealthAssessmentStore for FailingStore {
    async fn rollup_by_user(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<HealthRollup>, StoreError> {
        simulated_failure()
    }
}

#[async_trait]
impl RecommendationStore for FailingStore {
    async fn loan_advice_counts(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        simulated_failure()
    }

    async fn cost_cutting_counts(
        &self,
        _users: &[Uuid],
        _window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        simulated_failure()
    }

    async fn latest_loan_advice(
        &self,
        _users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        simulated_failure()
    }

    async fn latest_cost_cutting(
        &self,
        _users: &[Uuid],
    ) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        simulated_failure()
    }
}

// ---------------------------------------------------------------------------
// Batch-size recording
// ---------------------------------------------------------------------------

/// Wraps a [`FakeStore`] and records the batch size of every login-count
/// call, so tests can assert the population sweep stays bounded.
pub struct RecordingActivityStore {
    inner: Arc<FakeStore>,
    sizes: Mutex<Vec<usize>>,
}

impl RecordingActivityStore {
    pub fn new(inner: Arc<FakeStore>) -> Self {
        Self {
            inner,
            sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityLogStore for RecordingActivityStore {
    async fn login_counts(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        self.sizes.lock().unwrap().push(users.len());
        self.inner.login_counts(users, window).await
    }

    async fn last_logins(&self, users: &[Uuid]) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
        self.inner.last_logins(users).await
    }
}
