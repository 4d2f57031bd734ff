use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::CategoryColors;
use crate::data::filter::{apply, FilterCriteria};
use crate::data::loader::DatasetCache;
use crate::data::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Default source file, read from the working directory when present.
pub const DEFAULT_SOURCE: &str = "Dataset.csv";

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    RevenueOverTime,
    ByRegion,
    ByProduct,
    RegionProductHeatmap,
    WeekdayProfile,
    MonthlyGrowth,
    Table,
}

impl ChartView {
    pub const ALL: [ChartView; 7] = [
        ChartView::RevenueOverTime,
        ChartView::ByRegion,
        ChartView::ByProduct,
        ChartView::RegionProductHeatmap,
        ChartView::WeekdayProfile,
        ChartView::MonthlyGrowth,
        ChartView::Table,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartView::RevenueOverTime => "Revenue over time",
            ChartView::ByRegion => "Revenue by region",
            ChartView::ByProduct => "Revenue by product",
            ChartView::RegionProductHeatmap => "Region × product heatmap",
            ChartView::WeekdayProfile => "Day-of-week profile",
            ChartView::MonthlyGrowth => "Monthly growth",
            ChartView::Table => "Data table",
        }
    }
}

/// The full UI state, independent of rendering. Each interaction rebuilds
/// the criteria and synchronously recomputes the filtered view; aggregates
/// are derived from `filtered` at render time.
pub struct AppState {
    /// Session-owned dataset cache (reloads on mtime change or invalidate).
    pub cache: DatasetCache,

    /// Loaded dataset, shared read-only for the session.
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Records passing the current criteria (cached, source order).
    pub filtered: Vec<SalesRecord>,

    /// Stable per-category colours for the loaded dataset.
    pub product_colors: CategoryColors,
    pub region_colors: CategoryColors,

    /// Active central view.
    pub view: ChartView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::new(PathBuf::from(DEFAULT_SOURCE)),
            dataset: None,
            criteria: FilterCriteria {
                products: Default::default(),
                regions: Default::default(),
                start: NaiveDate::default(),
                end: NaiveDate::default(),
            },
            filtered: Vec::new(),
            product_colors: CategoryColors::default(),
            region_colors: CategoryColors::default(),
            view: ChartView::RevenueOverTime,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load (or reload) from the cache and ingest the result.
    pub fn load(&mut self) {
        match self.cache.get() {
            Ok(dataset) => {
                log::info!(
                    "loaded {} records from {}",
                    dataset.len(),
                    self.cache.source().display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Point the session at a different source file and reload.
    pub fn set_source(&mut self, path: PathBuf) {
        self.cache.set_source(path);
        self.load();
    }

    /// Drop the cached dataset and reload from disk.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.load();
    }

    /// Ingest a newly loaded dataset: select everything, rebuild colours.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.criteria = FilterCriteria::all_of(&dataset);
        self.product_colors = CategoryColors::new(&dataset.products);
        self.region_colors = CategoryColors::new(&dataset.regions);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filtered = apply(ds, &self.criteria);
        } else {
            self.filtered.clear();
        }
    }

    /// Toggle a single product in the selection.
    pub fn toggle_product(&mut self, label: &str) {
        if !self.criteria.products.remove(label) {
            self.criteria.products.insert(label.to_string());
        }
        self.refilter();
    }

    /// Toggle a single region in the selection.
    pub fn toggle_region(&mut self, label: &str) {
        if !self.criteria.regions.remove(label) {
            self.criteria.regions.insert(label.to_string());
        }
        self.refilter();
    }

    /// Select all or no products.
    pub fn select_products(&mut self, all: bool) {
        if let Some(ds) = &self.dataset {
            self.criteria.products = if all {
                ds.products.clone()
            } else {
                Default::default()
            };
            self.refilter();
        }
    }

    /// Select all or no regions.
    pub fn select_regions(&mut self, all: bool) {
        if let Some(ds) = &self.dataset {
            self.criteria.regions = if all {
                ds.regions.clone()
            } else {
                Default::default()
            };
            self.refilter();
        }
    }

    /// Set the inclusive date range.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.criteria.start = start;
        self.criteria.end = end;
        self.refilter();
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::all_of(ds);
            self.refilter();
        }
    }
}
