//! Fold a flat, chronological run of days into seven-day weeks

use chrono::NaiveDate;

use super::{
    ContributionCalendar, ContributionDay, ContributionWeek, DAYS_PER_WEEK, GridError, Result,
};

/// Group days into weeks of seven, padding a short trailing week with
/// dateless zero-count days.
///
/// Days must already be in strictly increasing date order; input is
/// rejected rather than re-sorted. `None` entries are unreadable days:
/// they keep their slot and are ignored by the ordering check.
///
/// The calendar total is the sum of the days given. Callers holding a
/// provider total should apply it with
/// [`ContributionCalendar::with_total_count`].
pub fn reshape<I>(days: I) -> Result<ContributionCalendar>
where
    I: IntoIterator<Item = Option<ContributionDay>>,
{
    let mut cells: Vec<Option<ContributionDay>> = Vec::new();
    let mut previous: Option<NaiveDate> = None;
    let mut total = 0u64;

    for (position, cell) in days.into_iter().enumerate() {
        if let Some(day) = &cell {
            let Some(date) = day.date else {
                return Err(GridError::InvalidInput(format!(
                    "day at position {} has no date",
                    position
                )));
            };
            if let Some(prev) = previous
                && date <= prev
            {
                return Err(GridError::InvalidInput(format!(
                    "days out of order at position {}: {} does not follow {}",
                    position, date, prev
                )));
            }
            previous = Some(date);
            total += day.count;
        }
        cells.push(cell);
    }

    let weeks = cells
        .chunks(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut days = [Some(ContributionDay::padding()); DAYS_PER_WEEK];
            days[..chunk.len()].copy_from_slice(chunk);
            ContributionWeek::new(days)
        })
        .collect();

    Ok(ContributionCalendar::new(weeks, total))
}
