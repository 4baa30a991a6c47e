//! Contribution calendar model and the grid rendering core.
//!
//! Everything in here is a pure function of its inputs: no I/O, no
//! shared state. Fetching happens in [`crate::github`], serving in
//! [`crate::api`].

pub mod color;
pub mod error;
pub mod labels;
pub mod options;
pub mod render;
pub mod reshape;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use color::{ColorRamp, Rgb, activity_level, generate_ramp, interpolate};
pub use error::{GridError, Result};
pub use labels::{MonthLabel, place_labels};
pub use options::{RenderOptions, RenderQuery};
pub use render::{GridRenderer, RenderedGrid, Renderer, SvgRenderer};
pub use reshape::reshape;

pub const DAYS_PER_WEEK: usize = 7;

/// Activity for one calendar day. Padding days appended to a short
/// trailing week have no date and a count of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: Option<NaiveDate>,
    pub count: u64,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self {
            date: Some(date),
            count,
        }
    }

    pub fn padding() -> Self {
        Self {
            date: None,
            count: 0,
        }
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

/// Exactly seven cells. A `None` cell is a day the provider sent but
/// that could not be read; it keeps its slot and renders empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionWeek {
    days: [Option<ContributionDay>; DAYS_PER_WEEK],
}

impl ContributionWeek {
    pub fn new(days: [Option<ContributionDay>; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[Option<ContributionDay>; DAYS_PER_WEEK] {
        &self.days
    }

    /// First readable date in the week, skipping padding and bad cells
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.iter().flatten().find_map(|day| day.date)
    }
}

impl TryFrom<Vec<Option<ContributionDay>>> for ContributionWeek {
    type Error = GridError;

    fn try_from(days: Vec<Option<ContributionDay>>) -> Result<Self> {
        let len = days.len();
        let days: [Option<ContributionDay>; DAYS_PER_WEEK] = days.try_into().map_err(|_| {
            GridError::InvalidInput(format!(
                "week has {} days, expected {}",
                len, DAYS_PER_WEEK
            ))
        })?;
        Ok(Self { days })
    }
}

/// Chronological weeks, oldest first, plus the total reported for
/// the whole range.
///
/// Deserializing goes through [`ContributionCalendar::validate`] so a
/// snapshot file is held to the same rules as [`reshape`] output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCalendar")]
pub struct ContributionCalendar {
    weeks: Vec<ContributionWeek>,
    total_count: u64,
}

/// Unchecked shape of a calendar as stored on disk
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalendar {
    weeks: Vec<ContributionWeek>,
    total_count: u64,
}

impl TryFrom<RawCalendar> for ContributionCalendar {
    type Error = GridError;

    fn try_from(raw: RawCalendar) -> Result<Self> {
        let calendar = Self::new(raw.weeks, raw.total_count);
        calendar.validate()?;
        Ok(calendar)
    }
}

impl ContributionCalendar {
    pub(crate) fn new(weeks: Vec<ContributionWeek>, total_count: u64) -> Self {
        Self { weeks, total_count }
    }

    /// Build from loosely shaped weeks, rejecting any week that is not
    /// seven cells long or that breaks [`ContributionCalendar::validate`].
    pub fn from_weeks(weeks: Vec<Vec<Option<ContributionDay>>>, total_count: u64) -> Result<Self> {
        let weeks = weeks
            .into_iter()
            .map(ContributionWeek::try_from)
            .collect::<Result<Vec<_>>>()?;
        let calendar = Self::new(weeks, total_count);
        calendar.validate()?;
        Ok(calendar)
    }

    /// Check the cell invariants: dated days strictly increase, padding
    /// days have a zero count and only trail the last dated day.
    /// Unreadable (`None`) cells may sit anywhere.
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<NaiveDate> = None;
        let mut padding_from: Option<usize> = None;

        for (position, day) in self.cells().enumerate() {
            let Some(day) = day else {
                continue;
            };
            match day.date {
                None if day.count > 0 => {
                    return Err(GridError::InvalidInput(format!(
                        "padding day at position {} has count {}",
                        position, day.count
                    )));
                }
                None => {
                    padding_from.get_or_insert(position);
                }
                Some(date) => {
                    if let Some(start) = padding_from {
                        return Err(GridError::InvalidInput(format!(
                            "day at position {} follows padding at position {}",
                            position, start
                        )));
                    }
                    if let Some(prev) = previous
                        && date <= prev
                    {
                        return Err(GridError::InvalidInput(format!(
                            "days out of order at position {}: {} does not follow {}",
                            position, date, prev
                        )));
                    }
                    previous = Some(date);
                }
            }
        }

        Ok(())
    }

    /// Replace the total, e.g. with the provider's own figure which can
    /// cover a different window than the weeks returned.
    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = total_count;
        self
    }

    pub fn weeks(&self) -> &[ContributionWeek] {
        &self.weeks
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// All cells in grid order
    pub fn cells(&self) -> impl Iterator<Item = &Option<ContributionDay>> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    pub fn max_count(&self) -> u64 {
        self.cells().flatten().map(|day| day.count).max().unwrap_or(0)
    }

    /// Dates aligned with the flattened grid; `None` for padding and
    /// unreadable cells.
    pub fn dates(&self) -> Vec<Option<NaiveDate>> {
        self.cells()
            .map(|cell| cell.and_then(|day| day.date))
            .collect()
    }
}
