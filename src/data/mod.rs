pub mod bar;
pub mod loader;

pub use bar::{Bar, BarError, BarSeries};
pub use loader::{filter_by_date_range, load_csv, parse_timestamp};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::data::Bar;
    use chrono::{Duration, TimeZone, Utc};

    //daily bars with open = high = low = close
    pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new_unchecked(start + Duration::days(i as i64), c, c, c, c, 1000.0))
            .collect()
    }
}
