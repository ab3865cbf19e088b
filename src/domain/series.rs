use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// One observation of the historical record: closing price in USD per
/// barrel on a given calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// The cleaned, date-indexed historical price record.
///
/// Construction goes through [`PriceSeries::from_points`], which enforces
/// the series invariants: strictly ascending unique dates and finite,
/// positive prices. Indexing and iteration never observe a violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from raw points: drops non-finite and non-positive
    /// prices, sorts ascending by date and deduplicates dates keeping the
    /// last occurrence.
    pub fn from_points(raw: Vec<PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = raw
            .into_iter()
            .filter(|p| p.price.is_finite() && p.price > 0.0)
            .collect();
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points, oldest first.
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Mean price per calendar month of `year`, keyed by month number.
    /// Months with no observations are absent.
    pub fn monthly_means(&self, year: i32) -> Vec<(u32, f64)> {
        let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for point in &self.points {
            if point.date.year() == year {
                let entry = buckets.entry(point.date.month()).or_insert((0.0, 0));
                entry.0 += point.price;
                entry.1 += 1;
            }
        }
        buckets
            .into_iter()
            .map(|(month, (sum, count))| (month, sum / count as f64))
            .collect()
    }

    /// Writes the series as `date,price` CSV rows with a header.
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["date", "price"])?;
        for point in &self.points {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.price.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_points_sorts_and_dedupes() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(date(2024, 1, 3), 81.0),
            PricePoint::new(date(2024, 1, 1), 80.0),
            PricePoint::new(date(2024, 1, 1), 79.5),
            PricePoint::new(date(2024, 1, 2), 80.5),
        ]);

        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        // Last occurrence wins on duplicate dates.
        assert_eq!(series.first().unwrap().price, 79.5);
    }

    #[test]
    fn from_points_drops_invalid_prices() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(date(2024, 1, 1), f64::NAN),
            PricePoint::new(date(2024, 1, 2), -3.0),
            PricePoint::new(date(2024, 1, 3), 0.0),
            PricePoint::new(date(2024, 1, 4), 82.0),
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().date, date(2024, 1, 4));
    }

    #[test]
    fn tail_returns_most_recent_points() {
        let series = PriceSeries::from_points(
            (1..=10)
                .map(|d| PricePoint::new(date(2024, 1, d), 80.0 + d as f64))
                .collect(),
        );
        let tail = series.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].date, date(2024, 1, 8));
        assert_eq!(tail[2].date, date(2024, 1, 10));

        // Asking for more than we have returns everything.
        assert_eq!(series.tail(100).len(), 10);
    }

    #[test]
    fn monthly_means_cover_only_requested_year() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(date(2023, 1, 10), 70.0),
            PricePoint::new(date(2023, 1, 20), 74.0),
            PricePoint::new(date(2023, 3, 5), 80.0),
            PricePoint::new(date(2024, 1, 5), 90.0),
        ]);

        let means = series.monthly_means(2023);
        assert_eq!(means, vec![(1, 72.0), (3, 80.0)]);
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let series = PriceSeries::from_points(vec![PricePoint::new(date(2024, 2, 29), 83.25)]);
        let mut buf = Vec::new();
        series.to_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "date,price\n2024-02-29,83.25\n");
    }
}
