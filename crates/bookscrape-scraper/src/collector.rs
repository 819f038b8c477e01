//! URL-keyed deduplication of collected listings.

use std::collections::HashSet;

use bookscrape_core::ListingRecord;

/// Append-only record set keyed by `url`. First-seen wins and insertion
/// order is preserved.
#[derive(Debug, Default)]
pub struct Collector {
    records: Vec<ListingRecord>,
    seen: HashSet<String>,
    duplicates: usize,
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` unless a record with the same `url` was accepted
    /// before. Returns `true` if the record was added.
    pub fn accept(&mut self, record: ListingRecord) -> bool {
        if self.seen.contains(&record.url) {
            tracing::debug!(url = %record.url, "discarding duplicate listing");
            self.duplicates += 1;
            return false;
        }
        self.seen.insert(record.url.clone());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records rejected as duplicates so far.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn record(title: &str, url: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_owned(),
            price_source: Decimal::new(1000, 2),
            price_converted: None,
            rating: 4,
            availability: "In stock".to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn accepts_distinct_urls_in_order() {
        let mut c = Collector::new();
        assert!(c.accept(record("A", "http://x/a")));
        assert!(c.accept(record("B", "http://x/b")));
        let titles: Vec<&str> = c.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn first_seen_wins_on_duplicate_url() {
        let mut c = Collector::new();
        assert!(c.accept(record("First", "http://x/a")));
        assert!(!c.accept(record("Second", "http://x/a")));
        assert_eq!(c.len(), 1);
        assert_eq!(c.duplicates(), 1);
        assert_eq!(c.records()[0].title, "First");
    }

    #[test]
    fn urls_stay_pairwise_distinct() {
        let mut c = Collector::new();
        for i in 0..20 {
            c.accept(record("T", &format!("http://x/{}", i % 7)));
        }
        let mut urls: Vec<&str> = c.records().iter().map(|r| r.url.as_str()).collect();
        let before = urls.len();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), before);
        assert_eq!(before, 7);
        assert_eq!(c.duplicates(), 13);
    }

    #[test]
    fn empty_collector() {
        let c = Collector::new();
        assert!(c.is_empty());
        assert!(c.into_records().is_empty());
    }
}
