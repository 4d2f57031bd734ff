use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::Weekday;

use crate::data::model::{MonthKey, SalesRecord, WEEK};

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Sum of revenue. `0.0` over an empty input.
pub fn total_revenue(records: &[SalesRecord]) -> f64 {
    records.iter().map(|r| r.revenue).sum()
}

/// Arithmetic mean of revenue. `None` over an empty input – callers must
/// treat this distinctly from `Some(0.0)`.
pub fn average_revenue(records: &[SalesRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(total_revenue(records) / records.len() as f64)
}

/// Number of distinct values of the keyed field.
pub fn distinct_count<K: Eq + Hash>(
    records: &[SalesRecord],
    key: impl Fn(&SalesRecord) -> K,
) -> usize {
    records
        .iter()
        .map(key)
        .collect::<std::collections::HashSet<K>>()
        .len()
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Revenue summed per key. Entries appear in first-occurrence order of the
/// key in the input; downstream rank selection relies on this for
/// deterministic tie-breaking.
pub fn group_sum<K: Eq + Hash + Clone>(
    records: &[SalesRecord],
    key: impl Fn(&SalesRecord) -> K,
) -> Vec<(K, f64)> {
    let mut order: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, f64)> = Vec::new();

    for rec in records {
        let k = key(rec);
        match order.get(&k) {
            Some(&i) => sums[i].1 += rec.revenue,
            None => {
                order.insert(k.clone(), sums.len());
                sums.push((k, rec.revenue));
            }
        }
    }
    sums
}

/// Mean revenue per key, same ordering rule as [`group_sum`].
pub fn group_mean<K: Eq + Hash + Clone>(
    records: &[SalesRecord],
    key: impl Fn(&SalesRecord) -> K,
) -> Vec<(K, f64)> {
    let mut order: HashMap<K, usize> = HashMap::new();
    let mut acc: Vec<(K, f64, usize)> = Vec::new();

    for rec in records {
        let k = key(rec);
        match order.get(&k) {
            Some(&i) => {
                acc[i].1 += rec.revenue;
                acc[i].2 += 1;
            }
            None => {
                order.insert(k.clone(), acc.len());
                acc.push((k, rec.revenue, 1));
            }
        }
    }
    acc.into_iter()
        .map(|(k, sum, n)| (k, sum / n as f64))
        .collect()
}

/// Record count per key, same ordering rule as [`group_sum`].
pub fn group_count<K: Eq + Hash + Clone>(
    records: &[SalesRecord],
    key: impl Fn(&SalesRecord) -> K,
) -> Vec<(K, usize)> {
    let mut order: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for rec in records {
        let k = key(rec);
        match order.get(&k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                order.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Rank selection
// ---------------------------------------------------------------------------

/// The `n` largest grouped sums, descending. The sort is stable, so ties
/// keep the aggregate's own (first-occurrence) order.
pub fn top_n<K: Clone>(groups: &[(K, f64)], n: usize) -> Vec<(K, f64)> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

/// The `n` smallest grouped sums, ascending. Stable, like [`top_n`].
pub fn bottom_n<K: Clone>(groups: &[(K, f64)], n: usize) -> Vec<(K, f64)> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

/// The largest-measure entry; the first occurrence wins ties.
pub fn max_entry<K>(groups: &[(K, f64)]) -> Option<&(K, f64)> {
    groups
        .iter()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
}

// ---------------------------------------------------------------------------
// Pivot matrix
// ---------------------------------------------------------------------------

/// A 2D revenue-sum table over two categorical fields. Cells with no
/// matching records are exactly `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `cells[row][col]`, dimensions `row_labels.len() × col_labels.len()`.
    pub cells: Vec<Vec<f64>>,
}

impl PivotMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.col_labels.is_empty()
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.col_labels.len()];
        for row in &self.cells {
            for (c, v) in row.iter().enumerate() {
                totals[c] += v;
            }
        }
        totals
    }

    /// Largest cell value, for color scaling. `0.0` when empty.
    pub fn max_cell(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .fold(0.0_f64, |m, &v| m.max(v))
    }
}

/// Build the revenue-sum matrix for two categorical fields. Row and column
/// labels appear in first-occurrence order of the input.
pub fn pivot<'a>(
    records: &'a [SalesRecord],
    row_key: impl Fn(&'a SalesRecord) -> &'a str,
    col_key: impl Fn(&'a SalesRecord) -> &'a str,
) -> PivotMatrix {
    let mut row_index: HashMap<&str, usize> = HashMap::new();
    let mut col_index: HashMap<&str, usize> = HashMap::new();
    let mut row_labels: Vec<String> = Vec::new();
    let mut col_labels: Vec<String> = Vec::new();

    for rec in records {
        let r = row_key(rec);
        if !row_index.contains_key(r) {
            row_index.insert(r, row_labels.len());
            row_labels.push(r.to_string());
        }
        let c = col_key(rec);
        if !col_index.contains_key(c) {
            col_index.insert(c, col_labels.len());
            col_labels.push(c.to_string());
        }
    }

    let mut cells = vec![vec![0.0; col_labels.len()]; row_labels.len()];
    for rec in records {
        let r = row_index[row_key(rec)];
        let c = col_index[col_key(rec)];
        cells[r][c] += rec.revenue;
    }

    PivotMatrix {
        row_labels,
        col_labels,
        cells,
    }
}

// ---------------------------------------------------------------------------
// Month-over-month growth
// ---------------------------------------------------------------------------

/// One (group, month) cell of the growth table.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthEntry {
    pub group: String,
    pub month: MonthKey,
    pub revenue: f64,
    /// Percentage change vs the group's previous month with data. `None`
    /// for the group's first month, and when the previous sum is zero.
    pub growth_pct: Option<f64>,
}

/// Per-group monthly revenue with month-over-month percentage change.
/// Groups in first-occurrence order, months ascending within each group.
pub fn monthly_growth<'a>(
    records: &'a [SalesRecord],
    group: impl Fn(&'a SalesRecord) -> &'a str,
) -> Vec<GrowthEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, std::collections::BTreeMap<MonthKey, f64>> = HashMap::new();

    for rec in records {
        let g = group(rec);
        if !sums.contains_key(g) {
            order.push(g);
        }
        *sums
            .entry(g)
            .or_default()
            .entry(MonthKey::of(rec.date))
            .or_insert(0.0) += rec.revenue;
    }

    let mut entries = Vec::new();
    for g in order {
        let months = &sums[g];
        let mut prev: Option<f64> = None;
        for (&month, &revenue) in months {
            let growth_pct = match prev {
                Some(p) if p != 0.0 => Some((revenue - p) / p * 100.0),
                _ => None,
            };
            entries.push(GrowthEntry {
                group: g.to_string(),
                month,
                revenue,
                growth_pct,
            });
            prev = Some(revenue);
        }
    }
    entries
}

// ---------------------------------------------------------------------------
// Day-of-week profile
// ---------------------------------------------------------------------------

/// Revenue summed per weekday, always all seven days in canonical week
/// order (Monday first), `0.0` for days with no records.
pub fn day_of_week_ranking(records: &[SalesRecord]) -> [(Weekday, f64); 7] {
    let mut sums = [0.0_f64; 7];
    for rec in records {
        sums[rec.weekday.num_days_from_monday() as usize] += rec.revenue;
    }
    WEEK.map(|day| (day, sums[day.num_days_from_monday() as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(date: &str, product: &str, region: &str, revenue: f64) -> SalesRecord {
        SalesRecord::new(d(date), product.into(), region.into(), revenue)
    }

    #[test]
    fn empty_input_has_defined_empty_results() {
        let empty: Vec<SalesRecord> = Vec::new();
        assert_eq!(total_revenue(&empty), 0.0);
        assert_eq!(average_revenue(&empty), None);
        assert_eq!(distinct_count(&empty, |r| r.product.clone()), 0);
        assert!(group_sum(&empty, |r| r.product.clone()).is_empty());
        assert!(monthly_growth(&empty, |r| r.product.as_str()).is_empty());
        assert!(pivot(&empty, |r| r.region.as_str(), |r| r.product.as_str()).is_empty());
        assert!(day_of_week_ranking(&empty).iter().all(|&(_, v)| v == 0.0));
    }

    #[test]
    fn group_sums_partition_the_total() {
        let records = vec![
            rec("2024-01-01", "Tablets", "North", 100.0),
            rec("2024-01-02", "Laptops", "South", 200.0),
            rec("2024-01-03", "Tablets", "South", 300.0),
        ];
        let by_product = group_sum(&records, |r| r.product.clone());
        assert_eq!(by_product, vec![("Tablets".to_string(), 400.0), ("Laptops".to_string(), 200.0)]);
        let grouped: f64 = by_product.iter().map(|&(_, v)| v).sum();
        assert_eq!(grouped, total_revenue(&records));
        assert_eq!(grouped, 600.0);
    }

    #[test]
    fn kpi_scalars() {
        let records = vec![
            rec("2024-01-01", "Tablets", "North", 100.0),
            rec("2024-01-02", "Laptops", "South", 200.0),
            rec("2024-01-03", "Tablets", "South", 300.0),
        ];
        assert_eq!(average_revenue(&records), Some(200.0));
        assert_eq!(distinct_count(&records, |r| r.product.clone()), 2);
        assert_eq!(distinct_count(&records, |r| r.region.clone()), 2);

        let means = group_mean(&records, |r| r.product.clone());
        assert_eq!(means[0], ("Tablets".to_string(), 200.0));
        let counts = group_count(&records, |r| r.region.clone());
        assert_eq!(counts, vec![("North".to_string(), 1), ("South".to_string(), 2)]);
    }

    #[test]
    fn top_n_sorts_descending_and_breaks_ties_by_first_occurrence() {
        let groups = vec![
            ("A".to_string(), 50.0),
            ("B".to_string(), 70.0),
            ("C".to_string(), 50.0),
            ("D".to_string(), 90.0),
        ];
        let top = top_n(&groups, 3);
        assert_eq!(
            top,
            vec![
                ("D".to_string(), 90.0),
                ("B".to_string(), 70.0),
                ("A".to_string(), 50.0), // tie with C: A occurred first
            ]
        );

        let bottom = bottom_n(&groups, 2);
        assert_eq!(bottom, vec![("A".to_string(), 50.0), ("C".to_string(), 50.0)]);

        // Fewer groups than requested is fine.
        assert_eq!(top_n(&groups, 10).len(), 4);
        assert!(top_n::<String>(&[], 5).is_empty());
    }

    #[test]
    fn max_entry_first_occurrence_wins_ties() {
        let groups = vec![("A".to_string(), 7.0), ("B".to_string(), 7.0)];
        assert_eq!(max_entry(&groups).unwrap().0, "A");
        assert!(max_entry::<String>(&[]).is_none());
    }

    #[test]
    fn pivot_fills_missing_cells_with_zero_and_totals_match_group_sums() {
        let records = vec![
            rec("2024-01-01", "Tablets", "North", 100.0),
            rec("2024-01-02", "Laptops", "South", 200.0),
            rec("2024-01-03", "Tablets", "South", 300.0),
        ];
        let m = pivot(&records, |r| r.region.as_str(), |r| r.product.as_str());
        assert_eq!(m.row_labels, vec!["North", "South"]);
        assert_eq!(m.col_labels, vec!["Tablets", "Laptops"]);
        // (North, Laptops) has no records
        assert_eq!(m.cells, vec![vec![100.0, 0.0], vec![300.0, 200.0]]);

        let by_region = group_sum(&records, |r| r.region.clone());
        let by_product = group_sum(&records, |r| r.product.clone());
        assert_eq!(m.row_totals(), by_region.iter().map(|&(_, v)| v).collect::<Vec<_>>());
        assert_eq!(m.col_totals(), by_product.iter().map(|&(_, v)| v).collect::<Vec<_>>());
        assert_eq!(m.max_cell(), 300.0);
    }

    #[test]
    fn monthly_growth_first_month_is_none() {
        let records = vec![
            rec("2024-01-10", "Tablets", "North", 1000.0),
            rec("2024-02-10", "Tablets", "North", 1500.0),
            rec("2024-03-10", "Tablets", "North", 1200.0),
        ];
        let growth = monthly_growth(&records, |r| r.product.as_str());
        assert_eq!(growth.len(), 3);
        assert_eq!(growth[0].growth_pct, None);
        assert_eq!(growth[1].growth_pct, Some(50.0));
        assert_eq!(growth[2].growth_pct, Some(-20.0));
    }

    #[test]
    fn monthly_growth_is_tracked_per_group() {
        let records = vec![
            rec("2024-01-05", "Tablets", "North", 100.0),
            rec("2024-01-20", "Laptops", "North", 400.0),
            rec("2024-02-05", "Tablets", "North", 200.0),
            rec("2024-02-20", "Laptops", "North", 200.0),
        ];
        let growth = monthly_growth(&records, |r| r.product.as_str());
        // Groups in first-occurrence order, months ascending within each.
        assert_eq!(growth[0].group, "Tablets");
        assert_eq!(growth[1].month.to_string(), "2024-02");
        assert_eq!(growth[1].growth_pct, Some(100.0));
        assert_eq!(growth[2].group, "Laptops");
        assert_eq!(growth[3].growth_pct, Some(-50.0));
    }

    #[test]
    fn day_profile_canonical_order_with_zero_fill() {
        // 2024-01-01 Monday, 2024-01-07 Sunday
        let records = vec![
            rec("2024-01-07", "Tablets", "North", 50.0),
            rec("2024-01-01", "Tablets", "North", 10.0),
            rec("2024-01-08", "Tablets", "North", 30.0), // also Monday
        ];
        let profile = day_of_week_ranking(&records);
        assert_eq!(profile[0], (Weekday::Mon, 40.0));
        assert_eq!(profile[6], (Weekday::Sun, 50.0));
        assert!(profile[1..6].iter().all(|&(_, v)| v == 0.0));
    }
}
