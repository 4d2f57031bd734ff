use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

// ---------------------------------------------------------------------------
// SalesRecord – one row of the source CSV
// ---------------------------------------------------------------------------

/// A single sales transaction (one row of the source file).
///
/// `weekday` is derived from `date` at load time and never read back from
/// the source, so the two can not disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    /// Non-negative, unrounded amount. Negative values are rejected by the
    /// loader.
    pub revenue: f64,
    pub weekday: Weekday,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, product: String, region: String, revenue: f64) -> Self {
        let weekday = date.weekday();
        SalesRecord {
            date,
            product,
            region,
            revenue,
            weekday,
        }
    }
}

// ---------------------------------------------------------------------------
// Weekday labels – fixed seven-entry mapping, Monday first
// ---------------------------------------------------------------------------

/// All seven weekdays in canonical week order (Monday first).
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Display label for a weekday. Exhaustive, so an unmapped day can not
/// exist at runtime.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// MonthKey – calendar-month grouping key
// ---------------------------------------------------------------------------

/// A calendar month, ordered chronologically. Displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All records, in source order.
    pub records: Vec<SalesRecord>,
    /// Sorted set of distinct product labels.
    pub products: BTreeSet<String>,
    /// Sorted set of distinct region labels.
    pub regions: BTreeSet<String>,
    /// Earliest and latest record date, `None` for an empty dataset.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut products = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            products.insert(rec.product.clone());
            regions.insert(rec.region.clone());
            date_span = Some(match date_span {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        SalesDataset {
            records,
            products,
            regions,
            date_span,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
