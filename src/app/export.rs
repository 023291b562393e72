use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Context, Result};

use super::RatingChart;

/// Write `date,open,high,low,close` rows for every bar.
pub fn write_bars_csv<W: Write>(chart: &RatingChart, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for bar in &chart.bars {
        writer.serialize(bar)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_bars_csv(chart: &RatingChart, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create export directory {}", parent.display())
        })?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    write_bars_csv(chart, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DailyBar, Mode};
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_rows() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let chart = RatingChart::new(
            "alice",
            Mode::Blitz,
            vec![
                DailyBar {
                    date: day(1),
                    open: 1000,
                    high: 1010,
                    low: 995,
                    close: 1005,
                },
                DailyBar::flat(day(2), 1005),
            ],
        );

        let mut out = Vec::new();
        write_bars_csv(&chart, &mut out).expect("csv written");
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "date,open,high,low,close\n2024-01-01,1000,1010,995,1005\n2024-01-02,1005,1005,1005,1005\n"
        );
    }

    #[test]
    fn saves_into_nested_directory() {
        let dir = std::env::temp_dir().join(format!("rating-chart-export-{}", std::process::id()));
        let path = dir.join("nested").join("bars.csv");
        let chart = RatingChart::new(
            "alice",
            Mode::Daily,
            vec![DailyBar::flat(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 1200)],
        );

        save_bars_csv(&chart, &path).expect("saved");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("2024-05-01,1200,1200,1200,1200\n"));

        fs::remove_dir_all(&dir).ok();
    }
}
