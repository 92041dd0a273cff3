//! Pure scoring functions over one user's composite metrics. No I/O.

use chrono::{DateTime, Utc};

use crate::domain::dashboard::RiskLevel;
use crate::domain::metrics::CompositeMetrics;

/// Days without activity before a farmer counts as inactive.
const INACTIVITY_DAYS: i64 = 30;

/// Engagement score below which a farmer is flagged for follow-up.
const LOW_ENGAGEMENT_THRESHOLD: f64 = 20.0;

/// 0-100 engagement index: capped per-category sub-scores, summed.
///
/// Auth and forecasting contribute up to 20 points each; expense tracking,
/// health and recommendations are split as documented below. The sum is
/// clamped so extreme activity in one category cannot push past 100.
pub fn engagement_score(metrics: &CompositeMetrics) -> f64 {
    let mut score = 0.0;

    // Auth activity (20 points)
    score += (metrics.auth.total_logins as f64 * 2.0).min(20.0);

    // Expense tracking (10 + 10 points)
    score += (metrics.expenses.expense_count as f64 * 0.5).min(10.0);
    score += (metrics.expenses.assessment_count as f64 * 2.0).min(10.0);

    // Forecasting (20 points)
    score += (metrics.forecasting.total_predictions as f64 * 2.0).min(20.0);

    // Health assessments (20 points)
    score += (metrics.health.total_assessments as f64 * 4.0).min(20.0);

    // Recommendations (10 + 10 points)
    score += (metrics.recommendations.loan_advice_count as f64 * 5.0).min(10.0);
    score += (metrics.recommendations.cost_cutting_count as f64 * 5.0).min(10.0);

    score.clamp(0.0, 100.0)
}

/// Risk classification from the financial metrics.
///
/// Negative profit is always high risk. Otherwise the two indicator
/// averages are combined; a 0.0 average is treated like a missing one, so
/// such users classify as `Unknown` rather than very-high-risk.
pub fn assess_risk(metrics: &CompositeMetrics) -> RiskLevel {
    if metrics.expenses.total_profit < 0.0 {
        return RiskLevel::High;
    }

    let stability = metrics
        .expenses
        .financial_stability_avg
        .filter(|v| *v != 0.0);
    let cash_flow = metrics.expenses.cash_flow_avg.filter(|v| *v != 0.0);

    match (stability, cash_flow) {
        (Some(stability), Some(cash_flow)) => {
            let financial_health = (stability + cash_flow) / 2.0;
            if financial_health < 30.0 {
                RiskLevel::High
            } else if financial_health < 60.0 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            }
        }
        _ => RiskLevel::Unknown,
    }
}

/// Whether a farmer should be surfaced for admin follow-up.
///
/// True when the most recent activity across all categories is more than
/// [`INACTIVITY_DAYS`] old, when risk is high, or when engagement is below
/// [`LOW_ENGAGEMENT_THRESHOLD`]. A user with no activity timestamps at all
/// skips the inactivity check.
pub fn needs_attention(
    metrics: &CompositeMetrics,
    engagement_score: f64,
    risk_level: RiskLevel,
    now: DateTime<Utc>,
) -> bool {
    if let Some(last_seen) = metrics.last_seen() {
        if now.signed_duration_since(last_seen).num_days() > INACTIVITY_DAYS {
            return true;
        }
    }

    if risk_level == RiskLevel::High {
        return true;
    }

    engagement_score < LOW_ENGAGEMENT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{
        AuthMetrics, ExpenseMetrics, ForecastingMetrics, HealthMetrics, RecommendationMetrics,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn active_metrics() -> CompositeMetrics {
        CompositeMetrics {
            auth: AuthMetrics {
                total_logins: 10,
                last_login: Some(now() - Duration::days(1)),
            },
            expenses: ExpenseMetrics {
                expense_count: 20,
                assessment_count: 5,
                total_profit: 500.0,
                financial_stability_avg: Some(80.0),
                cash_flow_avg: Some(90.0),
                last_activity: Some(now() - Duration::days(2)),
                ..Default::default()
            },
            forecasting: ForecastingMetrics {
                total_predictions: 10,
                last_prediction: Some(now() - Duration::days(3)),
                ..Default::default()
            },
            health: HealthMetrics {
                total_assessments: 5,
                last_assessment: Some(now() - Duration::days(4)),
                ..Default::default()
            },
            recommendations: RecommendationMetrics {
                loan_advice_count: 2,
                cost_cutting_count: 2,
                last_recommendation: Some(now() - Duration::days(5)),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_zero_activity_scores_zero() {
        assert_eq!(engagement_score(&CompositeMetrics::default()), 0.0);
    }

    #[test]
    fn test_fully_engaged_user_caps_at_100() {
        assert_eq!(engagement_score(&active_metrics()), 100.0);
    }

    #[test]
    fn test_extreme_counts_stay_capped_per_category() {
        let m = CompositeMetrics {
            auth: AuthMetrics {
                total_logins: 10_000,
                last_login: None,
            },
            ..Default::default()
        };
        assert_eq!(engagement_score(&m), 20.0);

        let m = CompositeMetrics {
            expenses: ExpenseMetrics {
                expense_count: 1_000_000,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(engagement_score(&m), 10.0);
    }

    #[test]
    fn test_engagement_is_monotone_in_each_count() {
        let base = CompositeMetrics {
            auth: AuthMetrics {
                total_logins: 3,
                last_login: None,
            },
            forecasting: ForecastingMetrics {
                total_predictions: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut more = base.clone();
        more.auth.total_logins += 1;
        assert!(engagement_score(&more) >= engagement_score(&base));

        let mut more = base.clone();
        more.health.total_assessments += 1;
        assert!(engagement_score(&more) >= engagement_score(&base));

        let mut more = base.clone();
        more.recommendations.cost_cutting_count += 1;
        assert!(engagement_score(&more) >= engagement_score(&base));
    }

    #[test]
    fn test_partial_scores_add_up() {
        let m = CompositeMetrics {
            auth: AuthMetrics {
                total_logins: 3, // 6 points
                last_login: None,
            },
            expenses: ExpenseMetrics {
                expense_count: 4,    // 2 points
                assessment_count: 1, // 2 points
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(engagement_score(&m), 10.0);
    }

    #[test]
    fn test_negative_profit_is_high_risk_regardless_of_averages() {
        let m = CompositeMetrics {
            expenses: ExpenseMetrics {
                total_profit: -100.0,
                financial_stability_avg: Some(95.0),
                cash_flow_avg: Some(95.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(assess_risk(&m), RiskLevel::High);
    }

    #[test]
    fn test_risk_thresholds() {
        let with_averages = |stability: f64, cash_flow: f64| CompositeMetrics {
            expenses: ExpenseMetrics {
                total_profit: 10.0,
                financial_stability_avg: Some(stability),
                cash_flow_avg: Some(cash_flow),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(assess_risk(&with_averages(20.0, 30.0)), RiskLevel::High);
        assert_eq!(assess_risk(&with_averages(50.0, 60.0)), RiskLevel::Medium);
        assert_eq!(assess_risk(&with_averages(80.0, 90.0)), RiskLevel::Low);
    }

    #[test]
    fn test_missing_or_zero_averages_are_unknown_risk() {
        assert_eq!(assess_risk(&CompositeMetrics::default()), RiskLevel::Unknown);

        // a 0.0 average counts as absent, not as very low risk
        let m = CompositeMetrics {
            expenses: ExpenseMetrics {
                total_profit: 10.0,
                financial_stability_avg: Some(0.0),
                cash_flow_avg: Some(50.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(assess_risk(&m), RiskLevel::Unknown);
    }

    #[test]
    fn test_high_risk_always_needs_attention() {
        let m = active_metrics();
        let score = engagement_score(&m);
        assert!(score >= LOW_ENGAGEMENT_THRESHOLD);
        assert!(needs_attention(&m, score, RiskLevel::High, now()));
    }

    #[test]
    fn test_recent_engaged_low_risk_user_does_not_need_attention() {
        let m = active_metrics();
        let score = engagement_score(&m);
        assert!(!needs_attention(&m, score, RiskLevel::Low, now()));
    }

    #[test]
    fn test_stale_activity_needs_attention() {
        let mut m = active_metrics();
        m.auth.last_login = Some(now() - Duration::days(90));
        m.expenses.last_activity = Some(now() - Duration::days(80));
        m.forecasting.last_prediction = Some(now() - Duration::days(70));
        m.health.last_assessment = Some(now() - Duration::days(60));
        m.recommendations.last_recommendation = Some(now() - Duration::days(50));
        let score = engagement_score(&m);
        assert!(needs_attention(&m, score, RiskLevel::Low, now()));
    }

    #[test]
    fn test_exactly_30_days_is_not_stale() {
        let mut m = active_metrics();
        m.auth.last_login = Some(now() - Duration::days(30));
        m.expenses.last_activity = None;
        m.forecasting.last_prediction = None;
        m.health.last_assessment = None;
        m.recommendations.last_recommendation = None;
        let score = engagement_score(&m);
        assert!(!needs_attention(&m, score, RiskLevel::Low, now()));
    }

    #[test]
    fn test_no_timestamps_skips_inactivity_check() {
        // engaged enough and low risk, but zero recency data: not flagged
        let m = CompositeMetrics {
            expenses: ExpenseMetrics {
                expense_count: 40,   // 10 points
                assessment_count: 5, // 10 points
                ..Default::default()
            },
            ..Default::default()
        };
        let score = engagement_score(&m);
        assert_eq!(score, 20.0);
        assert!(!needs_attention(&m, score, RiskLevel::Low, now()));
    }

    #[test]
    fn test_low_engagement_needs_attention() {
        let m = CompositeMetrics::default();
        assert!(needs_attention(&m, engagement_score(&m), RiskLevel::Unknown, now()));
    }
}
