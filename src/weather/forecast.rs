//! Day-bucketing of three-hourly forecast samples.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use tracing::warn;

use super::api_types::{Condition, ForecastEntry};

/// Number of days shown in the forecast list.
pub const FORECAST_DAYS: usize = 5;

/// All forecast samples that fall on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
  pub date: NaiveDate,
  pub temps: Vec<f64>,
  /// Condition of the first sample seen for this date
  pub weather: Option<Condition>,
  /// Provider timestamp text of the first sample
  pub dt_txt: String,
}

impl DailyBucket {
  pub fn max_temp(&self) -> Option<f64> {
    self.temps.iter().copied().reduce(f64::max)
  }

  pub fn min_temp(&self) -> Option<f64> {
    self.temps.iter().copied().reduce(f64::min)
  }
}

/// Group samples by their calendar date in `tz`, in encounter order.
///
/// The provider returns strictly increasing timestamps, so the first sample of
/// each date is also the earliest one.
pub fn group_by_day<Tz: TimeZone>(entries: &[ForecastEntry], tz: &Tz) -> Vec<DailyBucket> {
  let mut buckets: Vec<DailyBucket> = Vec::new();
  let mut index: HashMap<NaiveDate, usize> = HashMap::new();

  for entry in entries {
    let Some(utc) = DateTime::<Utc>::from_timestamp(entry.dt, 0) else {
      warn!(dt = entry.dt, "skipping forecast sample with invalid timestamp");
      continue;
    };
    let date = utc.with_timezone(tz).date_naive();

    let slot = *index.entry(date).or_insert_with(|| {
      buckets.push(DailyBucket {
        date,
        temps: Vec::new(),
        weather: entry.weather.first().cloned(),
        dt_txt: entry.dt_txt.clone(),
      });
      buckets.len() - 1
    });
    buckets[slot].temps.push(entry.main.temp);
  }

  buckets
}

/// The first `FORECAST_DAYS` dates in encounter order.
pub fn daily_buckets<Tz: TimeZone>(entries: &[ForecastEntry], tz: &Tz) -> Vec<DailyBucket> {
  let mut buckets = group_by_day(entries, tz);
  buckets.truncate(FORECAST_DAYS);
  buckets
}
