use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Filter criteria: product / region membership + inclusive date range
// ---------------------------------------------------------------------------

/// The conjunction of predicates applied on every interaction. Rebuilt by
/// the UI each time; nothing is persisted between applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Selected products. An empty set selects nothing (not everything).
    pub products: BTreeSet<String>,
    /// Selected regions. Same empty-set semantics as `products`.
    pub regions: BTreeSet<String>,
    /// Inclusive range start.
    pub start: NaiveDate,
    /// Inclusive range end. `start > end` is a valid, vacuous range.
    pub end: NaiveDate,
}

impl FilterCriteria {
    /// Criteria matching the whole dataset: every product, every region,
    /// the full date span.
    pub fn all_of(dataset: &SalesDataset) -> Self {
        let (start, end) = dataset.date_span.unwrap_or_else(|| {
            let today = NaiveDate::default();
            (today, today)
        });
        FilterCriteria {
            products: dataset.products.clone(),
            regions: dataset.regions.clone(),
            start,
            end,
        }
    }

    fn matches(&self, rec: &SalesRecord) -> bool {
        self.products.contains(&rec.product)
            && self.regions.contains(&rec.region)
            && self.start <= rec.date
            && rec.date <= self.end
    }
}

/// Apply the criteria, preserving input order. Pure; an empty result is a
/// valid outcome, never an error.
pub fn apply(dataset: &SalesDataset, criteria: &FilterCriteria) -> Vec<SalesRecord> {
    dataset
        .records
        .iter()
        .filter(|rec| criteria.matches(rec))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> SalesDataset {
        SalesDataset::from_records(vec![
            SalesRecord::new(d("2024-01-01"), "Tablets".into(), "North".into(), 100.0),
            SalesRecord::new(d("2024-01-02"), "Laptops".into(), "South".into(), 200.0),
            SalesRecord::new(d("2024-01-03"), "Tablets".into(), "South".into(), 300.0),
            SalesRecord::new(d("2024-02-01"), "Laptops".into(), "North".into(), 400.0),
        ])
    }

    #[test]
    fn all_of_matches_everything() {
        let ds = sample();
        let filtered = apply(&ds, &FilterCriteria::all_of(&ds));
        assert_eq!(filtered, ds.records);
    }

    #[test]
    fn conjunction_of_predicates() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.products = ["Tablets".to_string()].into();
        criteria.end = d("2024-01-02");

        let filtered = apply(&ds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, d("2024-01-01"));
    }

    #[test]
    fn empty_selection_yields_empty_result() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.regions.clear();
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn inverted_range_is_vacuous_not_an_error() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.start = d("2024-02-01");
        criteria.end = d("2024-01-01");
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.start = d("2024-01-02");
        criteria.end = d("2024-01-03");
        let filtered = apply(&ds, &criteria);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn shrinking_criteria_never_grows_the_result() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        let full = apply(&ds, &criteria).len();

        criteria.products.remove("Laptops");
        let fewer_products = apply(&ds, &criteria).len();
        assert!(fewer_products <= full);

        criteria.regions.remove("North");
        let fewer_regions = apply(&ds, &criteria).len();
        assert!(fewer_regions <= fewer_products);
    }

    #[test]
    fn output_preserves_input_order() {
        let ds = sample();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.regions = ["South".to_string()].into();
        let filtered = apply(&ds, &criteria);
        assert_eq!(filtered[0].product, "Laptops");
        assert_eq!(filtered[1].product, "Tablets");
    }
}
