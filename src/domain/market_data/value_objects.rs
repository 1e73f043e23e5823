use crate::domain::errors::{ChartError, ChartResult};
use chrono::{DateTime, NaiveDate};
use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Value Object - price level
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - traded quantity
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - calendar date with any time of day stripped.
///
/// Serialized as `YYYY-MM-DD`. Parsing accepts a bare date or a date followed
/// by a time part separated by `T` or a space; the time part is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display(fmt = "{}", _0)]
pub struct TradingDate(NaiveDate);

impl TradingDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Date of a UTC epoch-millisecond timestamp.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|dt| Self(dt.date_naive()))
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for TradingDate {
    type Err = ChartError;

    fn from_str(raw: &str) -> ChartResult<Self> {
        let trimmed = raw.trim();
        let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ChartError::InvalidDate(raw.to_string()))
    }
}

impl TryFrom<String> for TradingDate {
    type Error = ChartError;

    fn try_from(raw: String) -> ChartResult<Self> {
        raw.parse()
    }
}

impl From<TradingDate> for String {
    fn from(date: TradingDate) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::TradingDate;

    #[test]
    fn time_of_day_is_discarded() {
        let bare: TradingDate = "2024-03-01".parse().unwrap();
        let iso: TradingDate = "2024-03-01T15:30:00.000Z".parse().unwrap();
        let pandas: TradingDate = "2024-03-01 00:00:00".parse().unwrap();
        assert_eq!(bare, iso);
        assert_eq!(bare, pandas);
        assert_eq!(bare.to_string(), "2024-03-01");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("03/01/2024".parse::<TradingDate>().is_err());
        assert!("".parse::<TradingDate>().is_err());
    }

    #[test]
    fn unix_millis_maps_to_utc_date() {
        let date = TradingDate::from_unix_millis(1_709_251_200_000 + 3_600_000).unwrap();
        assert_eq!(date, TradingDate::from_ymd(2024, 3, 1).unwrap());
    }
}
