use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A source file that exists but can not be parsed is fatal; a missing file
/// is not (the loader falls back to the synthetic dataset).
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: unparsable date '{value}'")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: invalid revenue '{value}'")]
    InvalidRevenue { line: usize, value: String },
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Required columns, resolved once from the header row (case-insensitive).
/// Extra columns – e.g. the `day_of_week` written by our own exporter – are
/// ignored; the weekday is always re-derived from the date.
const COL_DATE: &str = "date";
const COL_PRODUCT: &str = "product";
const COL_REGION: &str = "region";
const COL_REVENUE: &str = "revenue";

/// Accepted date formats, tried in order. Sources exported from spreadsheet
/// tools commonly carry a time component on pure dates.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn find_column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or(DataLoadError::MissingColumn(name))
}

/// Load a sales dataset from a CSV file.
pub fn load_csv(path: &Path) -> Result<SalesDataset, DataLoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let date_idx = find_column(&headers, COL_DATE)?;
    let product_idx = find_column(&headers, COL_PRODUCT)?;
    let region_idx = find_column(&headers, COL_REGION)?;
    let revenue_idx = find_column(&headers, COL_REVENUE)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        // Header occupies line 1.
        let line = row_no + 2;

        let raw_date = row.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| DataLoadError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let raw_revenue = row.get(revenue_idx).unwrap_or("");
        let revenue: f64 =
            raw_revenue
                .trim()
                .parse()
                .map_err(|_| DataLoadError::InvalidRevenue {
                    line,
                    value: raw_revenue.to_string(),
                })?;
        if revenue < 0.0 || !revenue.is_finite() {
            return Err(DataLoadError::InvalidRevenue {
                line,
                value: raw_revenue.to_string(),
            });
        }

        let product = row.get(product_idx).unwrap_or("").trim().to_string();
        let region = row.get(region_idx).unwrap_or("").trim().to_string();

        records.push(SalesRecord::new(date, product, region, revenue));
    }

    Ok(SalesDataset::from_records(records))
}

/// Load from `path` if it exists, otherwise fall back to the deterministic
/// synthetic dataset. A file that exists but fails to parse is an error.
pub fn load_or_synthetic(path: &Path) -> Result<SalesDataset, DataLoadError> {
    if path.exists() {
        load_csv(path)
    } else {
        log::info!(
            "{} not found, generating synthetic sample dataset",
            path.display()
        );
        Ok(synthetic_dataset())
    }
}

// ---------------------------------------------------------------------------
// Synthetic sample dataset
// ---------------------------------------------------------------------------

pub const SAMPLE_PRODUCTS: [&str; 5] =
    ["Smartphones", "Tablets", "Laptops", "Headphones", "Accessories"];
pub const SAMPLE_REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];

/// Seeded so every cold start produces the identical dataset.
const SAMPLE_SEED: u64 = 42;
const SAMPLE_DAYS: u32 = 100;

/// Generate the built-in sample: 100 consecutive days starting 2024-01-01,
/// one to three transactions per day, revenue uniform in [1000, 50000).
pub fn synthetic_dataset() -> SalesDataset {
    let mut rng = SimpleRng::new(SAMPLE_SEED);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid fixed date");

    let mut records = Vec::new();
    for day in 0..SAMPLE_DAYS {
        let date = start + chrono::Days::new(day as u64);
        let per_day = 1 + (rng.next_u64() % 3) as usize;
        for _ in 0..per_day {
            let product = SAMPLE_PRODUCTS[(rng.next_u64() % 5) as usize];
            let region = SAMPLE_REGIONS[(rng.next_u64() % 5) as usize];
            let revenue = (1000 + rng.next_u64() % 49_000) as f64;
            records.push(SalesRecord::new(
                date,
                product.to_string(),
                region.to_string(),
                revenue,
            ));
        }
    }

    SalesDataset::from_records(records)
}

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

/// Owns the loaded dataset for the session. A reload happens only on cold
/// start, on explicit [`invalidate`](DatasetCache::invalidate), or when the
/// source file's modification time changes.
pub struct DatasetCache {
    source: PathBuf,
    modified: Option<SystemTime>,
    dataset: Option<Arc<SalesDataset>>,
}

impl DatasetCache {
    pub fn new(source: PathBuf) -> Self {
        DatasetCache {
            source,
            modified: None,
            dataset: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Point the cache at a different source file and drop the cached data.
    pub fn set_source(&mut self, source: PathBuf) {
        self.source = source;
        self.invalidate();
    }

    /// Drop the cached dataset; the next [`get`](DatasetCache::get) reloads.
    pub fn invalidate(&mut self) {
        self.dataset = None;
        self.modified = None;
    }

    fn source_mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.source)
            .and_then(|m| m.modified())
            .ok()
    }

    /// Return the cached dataset, reloading if cold or stale.
    pub fn get(&mut self) -> Result<Arc<SalesDataset>, DataLoadError> {
        let mtime = self.source_mtime();
        if let Some(ds) = &self.dataset {
            if mtime == self.modified {
                return Ok(Arc::clone(ds));
            }
            log::info!("{} changed on disk, reloading", self.source.display());
        }

        let dataset = Arc::new(load_or_synthetic(&self.source)?);
        self.modified = mtime;
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sales_lens_{}_{}.csv", std::process::id(), name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_iso_slash_and_datetime_dates() {
        let expect = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09"), Some(expect));
        assert_eq!(parse_date("03/09/2024"), Some(expect));
        assert_eq!(parse_date("09.03.2024"), Some(expect));
        assert_eq!(parse_date("2024-03-09 00:00:00"), Some(expect));
        assert_eq!(parse_date("2024-03-09T12:30:00"), Some(expect));
        assert_eq!(parse_date("ninth of march"), None);
    }

    #[test]
    fn loads_well_formed_csv() {
        let path = temp_csv(
            "ok",
            "date,product,region,revenue\n\
             2024-01-01,Tablets,North,1500\n\
             2024-01-02,Laptops,South,2500.5\n",
        );
        let ds = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].product, "Tablets");
        assert_eq!(ds.records[1].revenue, 2500.5);
        assert_eq!(
            ds.records[0].weekday,
            chrono::Weekday::Mon // 2024-01-01
        );
    }

    #[test]
    fn header_resolution_is_case_insensitive_and_ignores_extras() {
        let path = temp_csv(
            "headers",
            "Date,Product,REGION,Revenue,day_of_week\n\
             2024-01-01,Tablets,North,1500,Friday\n",
        );
        let ds = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // Weekday comes from the date, not from the stale extra column.
        assert_eq!(ds.records[0].weekday, chrono::Weekday::Mon);
    }

    #[test]
    fn missing_column_is_fatal() {
        let path = temp_csv("missing", "date,product,revenue\n2024-01-01,Tablets,10\n");
        let err = load_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, DataLoadError::MissingColumn("region")));
    }

    #[test]
    fn bad_date_and_negative_revenue_are_fatal() {
        let path = temp_csv(
            "baddate",
            "date,product,region,revenue\nnot-a-date,Tablets,North,10\n",
        );
        let err = load_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, DataLoadError::InvalidDate { line: 2, .. }));

        let path = temp_csv(
            "negative",
            "date,product,region,revenue\n2024-01-01,Tablets,North,-5\n",
        );
        let err = load_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, DataLoadError::InvalidRevenue { line: 2, .. }));
    }

    #[test]
    fn missing_file_falls_back_to_synthetic() {
        let path = std::env::temp_dir().join("sales_lens_definitely_absent.csv");
        let ds = load_or_synthetic(&path).unwrap();
        assert!(!ds.is_empty());
    }

    #[test]
    fn synthetic_dataset_is_reproducible() {
        let a = synthetic_dataset();
        let b = synthetic_dataset();
        assert_eq!(a.records, b.records);

        let (lo, hi) = a.date_span.unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        // 1..=3 records per day over 100 days
        assert!(a.len() >= 100 && a.len() <= 300);
        assert!(a.records.iter().all(|r| r.revenue >= 1000.0 && r.revenue < 50_000.0));
    }

    #[test]
    fn cache_reloads_only_on_invalidation() {
        let path = temp_csv(
            "cache",
            "date,product,region,revenue\n2024-01-01,Tablets,North,10\n",
        );
        let mut cache = DatasetCache::new(path.clone());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate();
        let third = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first.records, third.records);

        std::fs::remove_file(&path).ok();
    }
}
