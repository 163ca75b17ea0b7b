//! Raw web-log records and the in-memory table holding them.

use crate::error::{BandError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One logged page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the request happened.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Requested path.
    pub endpoint: String,
    pub user_id: i64,
    #[serde(default)]
    pub cohort_id: Option<i64>,
    pub source_ip: String,
}

impl LogRecord {
    pub fn new(
        date: DateTime<Utc>,
        endpoint: impl Into<String>,
        user_id: i64,
        cohort_id: Option<i64>,
        source_ip: impl Into<String>,
    ) -> Self {
        Self {
            date,
            endpoint: endpoint.into(),
            user_id,
            cohort_id,
            source_ip: source_ip.into(),
        }
    }
}

/// Parse a log timestamp.
///
/// Accepts RFC 3339 as well as naive `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]`
/// and `YYYY-MM-DDTHH:MM:SS[.f]`, the naive forms being read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(BandError::TimestampError(format!(
        "unrecognised timestamp '{}'",
        raw
    )))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// An ordered collection of log records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogTable {
    records: Vec<LogRecord>,
}

impl LogTable {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    /// Distinct user ids, ascending.
    pub fn user_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Records belonging to `user_id`, in table order.
    pub fn records_for_user(&self, user_id: i64) -> impl Iterator<Item = &LogRecord> + '_ {
        self.records.iter().filter(move |r| r.user_id == user_id)
    }
}

impl FromIterator<LogRecord> for LogTable {
    fn from_iter<I: IntoIterator<Item = LogRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LogTable {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(user_id: i64, day: u32) -> LogRecord {
        LogRecord::new(
            Utc.with_ymd_and_hms(2024, 2, day, 12, 0, 0).unwrap(),
            "/javascript-i",
            user_id,
            Some(22),
            "97.105.19.61",
        )
    }

    #[test]
    fn parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2018, 1, 26, 9, 55, 3).unwrap();

        assert_eq!(parse_timestamp("2018-01-26 09:55:03").unwrap(), expected);
        assert_eq!(parse_timestamp("2018-01-26T09:55:03").unwrap(), expected);
        assert_eq!(parse_timestamp("2018-01-26T09:55:03Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2018-01-26T10:55:03+01:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2018-01-26").unwrap(),
            Utc.with_ymd_and_hms(2018, 1, 26, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(BandError::TimestampError(_))
        ));
    }

    #[test]
    fn record_deserializes_from_json() {
        let json = r#"{"date":"2018-01-26 09:55:03","endpoint":"/","user_id":1,"cohort_id":null,"source_ip":"97.105.19.61"}"#;
        let rec: LogRecord = serde_json::from_str(json).unwrap();

        assert_eq!(rec.user_id, 1);
        assert_eq!(rec.cohort_id, None);
        assert_eq!(rec.endpoint, "/");
        assert_eq!(
            rec.date,
            Utc.with_ymd_and_hms(2018, 1, 26, 9, 55, 3).unwrap()
        );
    }

    #[test]
    fn record_rejects_bad_date() {
        let json = r#"{"date":"soon","endpoint":"/","user_id":1,"source_ip":"::1"}"#;
        assert!(serde_json::from_str::<LogRecord>(json).is_err());
    }

    #[test]
    fn table_lists_users_and_filters() {
        let table: LogTable = vec![record(3, 1), record(1, 2), record(3, 3)]
            .into_iter()
            .collect();

        assert_eq!(table.len(), 3);
        assert_eq!(table.user_ids(), vec![1, 3]);
        assert_eq!(table.records_for_user(3).count(), 2);
        assert_eq!(table.records_for_user(99).count(), 0);
        assert_eq!((&table).into_iter().count(), 3);
    }
}
