use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::data::model::{weekday_label, SalesRecord};

// ---------------------------------------------------------------------------
// CSV export of the filtered view
// ---------------------------------------------------------------------------

/// Output row: the source column set plus the derived weekday label.
/// The loader ignores `day_of_week` on re-import and re-derives it, which
/// keeps exported files round-trippable.
#[derive(Serialize)]
struct ExportRow<'a> {
    date: NaiveDate,
    product: &'a str,
    region: &'a str,
    revenue: f64,
    day_of_week: &'static str,
}

/// Serialize records as CSV to any writer. The header is written even for
/// an empty view so exports always re-load cleanly.
pub fn write_csv<W: Write>(records: &[SalesRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(["date", "product", "region", "revenue", "day_of_week"])
        .context("writing CSV header")?;
    for rec in records {
        wtr.serialize(ExportRow {
            date: rec.date,
            product: &rec.product,
            region: &rec.region,
            revenue: rec.revenue,
            day_of_week: weekday_label(rec.weekday),
        })
        .context("serializing record")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Write the filtered view to a file.
pub fn export_to_path(path: &Path, records: &[SalesRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(records, file)
}

/// Suggested export filename, stamped with the given date.
pub fn default_filename(today: NaiveDate) -> String {
    format!("sales_export_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn writes_header_and_derived_weekday() {
        let records = vec![SalesRecord::new(
            d("2024-01-01"),
            "Tablets".into(),
            "North".into(),
            1500.0,
        )];
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,product,region,revenue,day_of_week"));
        assert_eq!(lines.next(), Some("2024-01-01,Tablets,North,1500.0,Monday"));
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap().trim(),
            "date,product,region,revenue,day_of_week"
        );
    }

    #[test]
    fn filename_embeds_the_date() {
        assert_eq!(default_filename(d("2024-03-09")), "sales_export_2024-03-09.csv");
    }

    #[test]
    fn export_then_reload_round_trips() {
        let records = vec![
            SalesRecord::new(d("2024-01-01"), "Tablets".into(), "North".into(), 1500.0),
            SalesRecord::new(d("2024-01-06"), "Laptops".into(), "South".into(), 2500.5),
        ];

        let path = std::env::temp_dir().join(format!(
            "sales_lens_roundtrip_{}.csv",
            std::process::id()
        ));
        export_to_path(&path, &records).unwrap();
        let reloaded = loader::load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.records, records);
    }
}
