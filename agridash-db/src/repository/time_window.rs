use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Named reporting period selected by the dashboard caller.
///
/// Parsing is deliberately lenient: anything that is not a recognized filter
/// name resolves to [`TimeFilter::All`]. A malformed filter must degrade the
/// report to the unbounded view, never reject the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[default]
    All,
}

impl TimeFilter {
    /// Parse a filter name, falling back to `All` on unrecognized input.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => TimeFilter::Daily,
            "weekly" => TimeFilter::Weekly,
            "monthly" => TimeFilter::Monthly,
            "yearly" => TimeFilter::Yearly,
            _ => TimeFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Daily => "daily",
            TimeFilter::Weekly => "weekly",
            TimeFilter::Monthly => "monthly",
            TimeFilter::Yearly => "yearly",
            TimeFilter::All => "all",
        }
    }

    /// Resolve the filter against an explicit evaluation instant.
    pub fn window_from(&self, now: DateTime<Utc>) -> TimeWindow {
        let since = match self {
            TimeFilter::Daily => Some(now - Duration::days(1)),
            TimeFilter::Weekly => Some(now - Duration::days(7)),
            TimeFilter::Monthly => Some(now - Duration::days(30)),
            TimeFilter::Yearly => Some(now - Duration::days(365)),
            TimeFilter::All => None,
        };
        TimeWindow { since }
    }

    /// Resolve the filter against the current wall clock.
    pub fn window(&self) -> TimeWindow {
        self.window_from(Utc::now())
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete cutoff produced from a [`TimeFilter`].
///
/// `since: None` is the no-filter sentinel: every record matches regardless
/// of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Records on or after this instant are in the window
    pub since: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow { since: None };

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self.since {
            Some(since) => at >= since,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_named_filters_resolve_to_expected_cutoffs() {
        let now = now();
        assert_eq!(
            TimeFilter::Daily.window_from(now).since,
            Some(now - Duration::days(1))
        );
        assert_eq!(
            TimeFilter::Weekly.window_from(now).since,
            Some(now - Duration::days(7))
        );
        assert_eq!(
            TimeFilter::Monthly.window_from(now).since,
            Some(now - Duration::days(30))
        );
        assert_eq!(
            TimeFilter::Yearly.window_from(now).since,
            Some(now - Duration::days(365))
        );
        assert_eq!(TimeFilter::All.window_from(now).since, None);
    }

    #[test]
    fn test_parse_accepts_known_names_case_insensitively() {
        assert_eq!(TimeFilter::parse("daily"), TimeFilter::Daily);
        assert_eq!(TimeFilter::parse(" Weekly "), TimeFilter::Weekly);
        assert_eq!(TimeFilter::parse("MONTHLY"), TimeFilter::Monthly);
        assert_eq!(TimeFilter::parse("yearly"), TimeFilter::Yearly);
        assert_eq!(TimeFilter::parse("all"), TimeFilter::All);
    }

    #[test]
    fn test_parse_falls_back_to_all_on_garbage() {
        assert_eq!(TimeFilter::parse(""), TimeFilter::All);
        assert_eq!(TimeFilter::parse("fortnightly"), TimeFilter::All);
        assert_eq!(TimeFilter::parse("7"), TimeFilter::All);
    }

    #[test]
    fn test_window_containment() {
        let now = now();
        let weekly = TimeFilter::Weekly.window_from(now);
        assert!(weekly.contains(now - Duration::days(3)));
        assert!(weekly.contains(now - Duration::days(7)));
        assert!(!weekly.contains(now - Duration::days(8)));

        assert!(TimeWindow::UNBOUNDED.contains(now - Duration::days(10_000)));
    }
}
