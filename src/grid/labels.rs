//! Month and year labels for the columns of a contribution grid

use chrono::Datelike;
use serde::Serialize;

use super::ContributionCalendar;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Left offset and column stride used by the web chart to position labels
pub const LABEL_BASE_PADDING: f64 = 75.0;
pub const LABEL_COLUMN_STRIDE: f64 = 13.0;

/// A month label attached to the first week that starts in that month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    pub month: &'static str,
    pub year: i32,
    pub week_index: usize,
    /// Only set when the year differs from the previous label's
    pub show_year: bool,
}

impl MonthLabel {
    /// Horizontal position as `base + week_index * stride`
    pub fn x(&self, base: f64, stride: f64) -> f64 {
        base + self.week_index as f64 * stride
    }
}

/// Walk the weeks and emit a label each time the month of a week's
/// first readable day changes. Weeks with no readable day are skipped.
pub fn place_labels(calendar: &ContributionCalendar) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();

    for (week_index, week) in calendar.weeks().iter().enumerate() {
        let Some(date) = week.first_date() else {
            continue;
        };
        let month = MONTH_NAMES[date.month0() as usize];

        let previous = labels.last();
        if previous.is_some_and(|label| label.month == month) {
            continue;
        }

        let show_year = previous.is_none_or(|label| label.year != date.year());
        labels.push(MonthLabel {
            month,
            year: date.year(),
            week_index,
            show_year,
        });
    }

    labels
}

/// Weekday column labels with every other day blanked, as GitHub does
pub fn weekday_labels() -> Vec<&'static str> {
    WEEKDAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| if i % 2 == 0 { *name } else { "" })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ContributionDay, ContributionWeek, DAYS_PER_WEEK};
    use chrono::NaiveDate;

    fn week_starting(y: i32, m: u32, d: u32) -> ContributionWeek {
        let start = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let days: [Option<ContributionDay>; DAYS_PER_WEEK] = std::array::from_fn(|i| {
            Some(ContributionDay::new(
                start + chrono::Duration::days(i as i64),
                1,
            ))
        });
        ContributionWeek::new(days)
    }

    #[test]
    fn test_labels_for_two_months() {
        let cal = ContributionCalendar::new(
            vec![
                week_starting(2024, 1, 7),
                week_starting(2024, 1, 14),
                week_starting(2024, 2, 4),
                week_starting(2024, 2, 11),
                week_starting(2024, 2, 18),
            ],
            0,
        );

        let labels = place_labels(&cal);
        assert_eq!(
            labels,
            vec![
                MonthLabel {
                    month: "Jan",
                    year: 2024,
                    week_index: 0,
                    show_year: true,
                },
                MonthLabel {
                    month: "Feb",
                    year: 2024,
                    week_index: 2,
                    show_year: false,
                },
            ]
        );
    }

    #[test]
    fn test_year_shown_only_when_it_changes() {
        let cal = ContributionCalendar::new(
            vec![
                week_starting(2023, 12, 24),
                week_starting(2024, 1, 7),
                week_starting(2024, 2, 4),
            ],
            0,
        );

        let shown: Vec<(&str, bool)> = place_labels(&cal)
            .iter()
            .map(|l| (l.month, l.show_year))
            .collect();
        assert_eq!(shown, vec![("Dec", true), ("Jan", true), ("Feb", false)]);
    }

    #[test]
    fn test_padding_first_day_uses_next_readable_day() {
        let mut days = [Some(ContributionDay::padding()); DAYS_PER_WEEK];
        days[1] = None;
        days[2] = Some(ContributionDay::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            0,
        ));
        let cal = ContributionCalendar::new(vec![ContributionWeek::new(days)], 0);

        let labels = place_labels(&cal);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].month, "May");
    }

    #[test]
    fn test_all_padding_week_is_skipped() {
        let cal = ContributionCalendar::new(
            vec![ContributionWeek::new(
                [Some(ContributionDay::padding()); DAYS_PER_WEEK],
            )],
            0,
        );
        assert!(place_labels(&cal).is_empty());
    }

    #[test]
    fn test_label_position() {
        let label = MonthLabel {
            month: "Mar",
            year: 2024,
            week_index: 4,
            show_year: false,
        };
        assert_eq!(label.x(LABEL_BASE_PADDING, LABEL_COLUMN_STRIDE), 127.0);
    }

    #[test]
    fn test_weekday_labels_alternate() {
        assert_eq!(weekday_labels(), vec!["Sun", "", "Tue", "", "Thu", "", "Sat"]);
    }
}
