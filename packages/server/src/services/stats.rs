//! Per-owner statistics over plate records.
//!
//! Calendar buckets are computed in a fixed UTC offset. Daily buckets cover
//! the last seven calendar days including today; monthly buckets cover the
//! last five calendar months including the current one. Both are ordered
//! oldest first and labelled with English weekday or month names.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::AppError;
use crate::store::RecordStore;

pub const DAILY_BUCKETS: u32 = 7;
pub const MONTHLY_BUCKETS: u32 = 5;
pub const TOP_REGIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

/// Labelled counts, serialized as a JSON object that keeps bucket order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buckets(pub Vec<Bucket>);

impl Buckets {
    pub fn total(&self) -> u64 {
        self.0.iter().map(|b| b.count).sum()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|b| b.label == label).map(|b| b.count)
    }
}

impl Serialize for Buckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for bucket in &self.0 {
            map.serialize_entry(&bucket.label, &bucket.count)?;
        }
        map.end()
    }
}

pub async fn total(records: &dyn RecordStore, owner: &str) -> Result<u64, AppError> {
    Ok(records.count_owned(owner).await?)
}

pub async fn per_region(records: &dyn RecordStore, owner: &str) -> Result<Buckets, AppError> {
    let regions = records.owned_regions(owner).await?;
    Ok(top_regions(regions, TOP_REGIONS))
}

pub async fn daily(
    records: &dyn RecordStore,
    owner: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Buckets, AppError> {
    let days = last_days(local_date(now, offset), DAILY_BUCKETS);
    let since = start_of_day(days[0], offset);
    let timestamps = records.owned_timestamps_since(owner, since).await?;
    Ok(count_daily(&days, &timestamps, offset))
}

pub async fn monthly(
    records: &dyn RecordStore,
    owner: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Buckets, AppError> {
    let months = last_months(local_date(now, offset), MONTHLY_BUCKETS);
    let since = start_of_day(months[0], offset);
    let timestamps = records.owned_timestamps_since(owner, since).await?;
    Ok(count_monthly(&months, &timestamps, offset))
}

/// Count regions, most frequent first, keeping at most `limit`.
///
/// `regions` must be in scan order; ties keep the order in which each region
/// was first seen.
pub fn top_regions(regions: impl IntoIterator<Item = String>, limit: usize) -> Buckets {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for region in regions {
        match index.get(&region) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(region.clone(), buckets.len());
                buckets.push(Bucket {
                    label: region,
                    count: 1,
                });
            }
        }
    }
    // Stable sort preserves first-seen order among equal counts.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(limit);
    Buckets(buckets)
}

/// One bucket per day in `days`, counting timestamps whose local date matches.
pub fn count_daily(days: &[NaiveDate], timestamps: &[i64], offset: FixedOffset) -> Buckets {
    let mut counts = vec![0u64; days.len()];
    for date in timestamps.iter().filter_map(|&ts| local_date_of(ts, offset)) {
        if let Some(i) = days.iter().position(|d| *d == date) {
            counts[i] += 1;
        }
    }
    Buckets(
        days.iter()
            .zip(counts)
            .map(|(day, count)| Bucket {
                label: day.format("%A").to_string(),
                count,
            })
            .collect(),
    )
}

/// One bucket per month in `months` (first days of months), counting by local
/// year and month.
pub fn count_monthly(months: &[NaiveDate], timestamps: &[i64], offset: FixedOffset) -> Buckets {
    let mut counts = vec![0u64; months.len()];
    for date in timestamps.iter().filter_map(|&ts| local_date_of(ts, offset)) {
        if let Some(i) = months
            .iter()
            .position(|m| m.year() == date.year() && m.month() == date.month())
        {
            counts[i] += 1;
        }
    }
    Buckets(
        months
            .iter()
            .zip(counts)
            .map(|(month, count)| Bucket {
                label: month.format("%B").to_string(),
                count,
            })
            .collect(),
    )
}

/// `n` consecutive days ending at `today`, oldest first.
pub fn last_days(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
        .collect()
}

/// First days of `n` consecutive months ending at the month of `today`,
/// oldest first.
pub fn last_months(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let first = today.with_day(1).unwrap_or(today);
    (0..n)
        .rev()
        .filter_map(|back| first.checked_sub_months(Months::new(back)))
        .collect()
}

fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn local_date_of(ts_ms: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ts_ms).map(|dt| local_date(dt, offset))
}

/// Epoch milliseconds of local midnight at the start of `date`.
fn start_of_day(date: NaiveDate, offset: FixedOffset) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}
