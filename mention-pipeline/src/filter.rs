use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

/// Per-run gate in front of extraction: tracks processed item ids and rejects
/// anything older than the retention cutoff. `now` is captured once at
/// construction so the cutoff is consistent across the whole pass.
#[derive(Debug)]
pub struct RunFilter {
    processed_ids: HashSet<String>,
    cutoff: DateTime<Utc>,
}

impl RunFilter {
    pub fn new(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            processed_ids: HashSet::new(),
            cutoff: now - window,
        }
    }

    /// Side-effect free check. Callers that proceed with the item must call
    /// [`mark_processed`](Self::mark_processed) themselves.
    pub fn accept(&self, item_id: &str, created_utc: DateTime<Utc>) -> bool {
        !self.processed_ids.contains(item_id) && created_utc >= self.cutoff
    }

    pub fn mark_processed(&mut self, item_id: String) {
        self.processed_ids.insert(item_id);
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with_week_window(now: DateTime<Utc>) -> RunFilter {
        RunFilter::new(now, Duration::days(7))
    }

    #[test]
    fn test_rejects_items_older_than_window() {
        let now = Utc::now();
        let filter = filter_with_week_window(now);

        assert!(!filter.accept("old", now - Duration::days(8)));
        assert!(filter.accept("recent", now - Duration::days(6)));
    }

    #[test]
    fn test_rejects_already_processed_ids() {
        let now = Utc::now();
        let mut filter = filter_with_week_window(now);
        let created = now - Duration::hours(1);

        assert!(filter.accept("abc", created));
        filter.mark_processed("abc".to_string());
        assert!(!filter.accept("abc", created));

        // Other ids unaffected
        assert!(filter.accept("c_abc", created));
    }

    #[test]
    fn test_cutoff_is_fixed_at_construction() {
        let now = Utc::now();
        let filter = filter_with_week_window(now);
        assert_eq!(filter.cutoff(), now - Duration::days(7));
    }

    #[test]
    fn test_exact_cutoff_is_accepted() {
        let now = Utc::now();
        let filter = filter_with_week_window(now);
        assert!(filter.accept("edge", now - Duration::days(7)));
    }
}
