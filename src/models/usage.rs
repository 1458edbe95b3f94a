use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Daily usage counter for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub identity: String,
    pub count: u32,
    /// Calendar day (UTC) the count belongs to, `YYYY-MM-DD`.
    pub window: String,
}

/// Outcome of a single check-and-consume against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeOutcome {
    pub allowed: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub remaining: u32,
}

pub fn window_for(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Time left until the next UTC midnight, when the current window closes.
pub fn until_window_end(now: DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now.date_naive() + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (next_midnight - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_is_utc_date() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(window_for(now), "2026-03-14");

        let later = now + Duration::seconds(1);
        assert_eq!(window_for(later), "2026-03-15");
    }

    #[test]
    fn test_until_window_end() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 0, 0).unwrap();
        assert_eq!(until_window_end(now), std::time::Duration::from_secs(3600));
    }
}
