//! Date window for a contributions query

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::grid::GridError;

pub const DEFAULT_MONTHS: u32 = 12;
pub const MAX_MONTHS: u32 = 120;

/// Raw range parameters from a query string
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RangeQuery {
    pub months: Option<String>,
    #[serde(alias = "startDate")]
    pub from: Option<String>,
    #[serde(alias = "endDate")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of the day
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    start_of_day(next) - chrono::Duration::milliseconds(1)
}

impl DateRange {
    /// From the start of the day `months` ago to the end of today
    pub fn last_months(months: u32, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let start = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(today);

        Self {
            from: start_of_day(start).and_utc(),
            to: end_of_day(today).and_utc(),
        }
    }

    /// Pick the window from query parameters: `months` wins, then an
    /// explicit `from`/`to` pair, then the last twelve months.
    pub fn resolve(query: &RangeQuery, now: DateTime<Utc>) -> Result<Self, GridError> {
        if let Some(months) = query.months.as_deref() {
            let months = match months.trim().parse::<u32>() {
                Ok(m) if (1..=MAX_MONTHS).contains(&m) => m,
                _ => {
                    tracing::debug!("Ignoring months={:?}, using {}", months, DEFAULT_MONTHS);
                    DEFAULT_MONTHS
                }
            };
            return Ok(Self::last_months(months, now));
        }

        if let (Some(from), Some(to)) = (query.from.as_deref(), query.to.as_deref()) {
            let from = parse_bound(from, start_of_day)?;
            let to = parse_bound(to, end_of_day)?;
            if from > to {
                return Err(GridError::InvalidInput(format!(
                    "range starts after it ends: {} > {}",
                    from, to
                )));
            }
            return Ok(Self { from, to });
        }

        Ok(Self::last_months(DEFAULT_MONTHS, now))
    }

    /// ISO-8601 with milliseconds, as the GraphQL `DateTime` scalar expects
    pub fn from_iso(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn to_iso(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Either a bare `YYYY-MM-DD`, pinned to the start or end of that day,
/// or a full RFC 3339 timestamp.
fn parse_bound(
    raw: &str,
    pin: fn(NaiveDate) -> NaiveDateTime,
) -> Result<DateTime<Utc>, GridError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(pin(date).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GridError::InvalidInput(format!("bad date {:?}: {}", raw, e)))
}
