//! Turn a contribution calendar into something displayable.
//!
//! There is one coloring rule and two outputs: [`GridRenderer`] gives a
//! JSON friendly structure for a client-side chart, [`SvgRenderer`] a
//! standalone SVG document.

use chrono::NaiveDate;
use serde::Serialize;

use super::color::{ColorRamp, Rgb};
use super::labels::{
    LABEL_BASE_PADDING, LABEL_COLUMN_STRIDE, MonthLabel, place_labels, weekday_labels,
};
use super::options::{ColorMode, RenderOptions};
use super::{ContributionCalendar, ContributionDay, DAYS_PER_WEEK};

/// Height reserved above the grid for month labels
pub const MONTH_LABEL_HEIGHT: f64 = 20.0;
/// Width reserved left of the grid for weekday labels
pub const WEEKDAY_LABEL_WIDTH: f64 = 30.0;
/// Height reserved below the grid for the contribution total
pub const SUMMARY_HEIGHT: f64 = 20.0;
/// Rough rendered width of a three letter month label
const MONTH_LABEL_TEXT_WIDTH: f64 = 30.0;

/// A rendering strategy for a contribution calendar
pub trait Renderer {
    type Output;

    fn render(&self, calendar: &ContributionCalendar, options: &RenderOptions) -> Self::Output;
}

/// Color of a single readable day
fn day_color(day: &ContributionDay, max_count: u64, ramp: &ColorRamp, inactive: Rgb) -> Rgb {
    ramp.color_for(day.count, max_count).unwrap_or(inactive)
}

/// `No contributions`, `1 contribution`, `5 contributions`
pub fn contribution_text(count: u64) -> String {
    match count {
        0 => "No contributions".to_string(),
        1 => "1 contribution".to_string(),
        n => format!("{} contributions", n),
    }
}

/// Total with thousands separators, e.g. `1,234 contributions in the last year`
pub fn summary_text(total: u64) -> String {
    let digits = total.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} contributions in the last year", grouped)
}

/// Month label with its position in the web chart
#[derive(Debug, Clone, Serialize)]
pub struct PlacedLabel {
    #[serde(flatten)]
    pub label: MonthLabel,
    pub x: f64,
}

/// Structured grid for client-side rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedGrid {
    /// Seven colors per week, `null` where a day could not be read
    pub weeks: Vec<[Option<Rgb>; DAYS_PER_WEEK]>,
    /// Seven counts per week, aligned with `weeks`
    pub contributions: Vec<[Option<u64>; DAYS_PER_WEEK]>,
    /// Flattened dates, `null` for padding
    pub dates: Vec<Option<NaiveDate>>,
    /// Flattened hover text, `null` where a day could not be read
    pub tooltips: Vec<Option<String>>,
    pub max_count: u64,
    pub total_contributions: u64,
    pub month_labels: Vec<PlacedLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_labels: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub options: RenderOptions,
}

/// Continuous interpolation by default
#[derive(Debug, Default, Clone, Copy)]
pub struct GridRenderer;

impl Renderer for GridRenderer {
    type Output = RenderedGrid;

    fn render(&self, calendar: &ContributionCalendar, options: &RenderOptions) -> RenderedGrid {
        let max_count = calendar.max_count();
        let ramp = options.ramp(ColorMode::Continuous);

        let weeks = calendar
            .weeks()
            .iter()
            .map(|week| {
                week.days().map(|cell| {
                    cell.map(|day| day_color(&day, max_count, &ramp, options.inactive_color))
                })
            })
            .collect();

        let contributions = calendar
            .weeks()
            .iter()
            .map(|week| week.days().map(|cell| cell.map(|day| day.count)))
            .collect();

        let tooltips = calendar
            .cells()
            .map(|cell| {
                cell.map(|day| match day.date {
                    Some(date) => format!(
                        "{} on {}",
                        contribution_text(day.count),
                        date.format("%a %b %d %Y")
                    ),
                    None => contribution_text(day.count),
                })
            })
            .collect();

        let month_labels = place_labels(calendar)
            .into_iter()
            .map(|label| PlacedLabel {
                x: label.x(LABEL_BASE_PADDING, LABEL_COLUMN_STRIDE),
                label,
            })
            .collect();

        RenderedGrid {
            weeks,
            contributions,
            dates: calendar.dates(),
            tooltips,
            max_count,
            total_contributions: calendar.total_count(),
            month_labels,
            weekday_labels: options.show_weekday_labels.then(weekday_labels),
            summary: options
                .show_contribution_count
                .then(|| summary_text(calendar.total_count())),
            options: options.clone(),
        }
    }
}

/// Quantized four level ramp by default
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub default_levels: usize,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self { default_levels: 4 }
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, calendar: &ContributionCalendar, options: &RenderOptions) -> String {
        let weeks = calendar.weeks();
        let stride = options.stride();
        let box_size = options.box_size;
        let radius = options.border_radius;

        let gutter = if options.show_weekday_labels {
            WEEKDAY_LABEL_WIDTH
        } else {
            0.0
        };
        let label_height = if options.show_month_labels {
            MONTH_LABEL_HEIGHT
        } else {
            0.0
        };
        let footer = if options.show_contribution_count {
            SUMMARY_HEIGHT
        } else {
            0.0
        };

        let width = stride * weeks.len() as f64 + gutter;
        let height = stride * DAYS_PER_WEEK as f64 + label_height + footer;

        let max_count = calendar.max_count();
        let ramp = options.ramp(ColorMode::Levels(self.default_levels));
        let label_color = options.label_color;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg" style="background-color: {}">"#,
            options.background_color
        ));

        if options.show_month_labels {
            let labels = place_labels(calendar);
            for (i, label) in labels.iter().enumerate() {
                let end = labels
                    .get(i + 1)
                    .map(|next| next.week_index)
                    .unwrap_or(weeks.len());
                let span = (end - label.week_index) as f64 * stride;
                let x = gutter
                    + label.week_index as f64 * stride
                    + (span - MONTH_LABEL_TEXT_WIDTH) / 2.0;
                svg.push_str(&format!(
                    r#"<text x="{x}" y="15" font-family="Arial" font-size="12" fill="{label_color}">{}</text>"#,
                    label.month
                ));
            }
        }

        if options.show_weekday_labels {
            for (row, name) in weekday_labels().into_iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                let y = label_height + row as f64 * stride + box_size;
                svg.push_str(&format!(
                    r#"<text x="0" y="{y}" font-family="Arial" font-size="9" fill="{label_color}">{name}</text>"#
                ));
            }
        }

        for (week_index, week) in weeks.iter().enumerate() {
            for (day_index, cell) in week.days().iter().enumerate() {
                // Unreadable days leave an empty cell
                let Some(day) = cell else {
                    continue;
                };

                let x = gutter + week_index as f64 * stride;
                let y = day_index as f64 * stride + label_height;
                let fill = day_color(day, max_count, &ramp, options.inactive_color);

                let text = contribution_text(day.count);
                let title = match day.date {
                    Some(date) => format!("{}\n{}", date.format("%A, %B %-d, %Y"), text),
                    None => text,
                };

                svg.push_str(&format!(
                    r#"<g><title>{title}</title><rect x="{x}" y="{y}" width="{box_size}" height="{box_size}" rx="{radius}" ry="{radius}" fill="{fill}"/></g>"#
                ));
            }
        }

        if options.show_contribution_count {
            svg.push_str(&format!(
                r#"<text x="{gutter}" y="{}" font-family="Arial" font-size="12" fill="{label_color}">{}</text>"#,
                height - 5.0,
                summary_text(calendar.total_count())
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::color::interpolate;
    use crate::grid::reshape;
    use chrono::Duration;

    fn calendar(counts: &[u64]) -> ContributionCalendar {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        reshape(
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| Some(ContributionDay::new(start + Duration::days(i as i64), c))),
        )
        .unwrap()
    }

    fn bw_options(mode: ColorMode) -> RenderOptions {
        RenderOptions {
            start_color: "#ffffff".parse().unwrap(),
            end_color: "#000000".parse().unwrap(),
            inactive_color: "#ebedf0".parse().unwrap(),
            color_mode: Some(mode),
            ..RenderOptions::default()
        }
    }

    /// Every `fill` on a `<rect>`
    fn rect_fills(svg: &str) -> Vec<String> {
        svg.split("<rect")
            .skip(1)
            .filter_map(|rect| {
                let start = rect.find("fill=\"")? + 6;
                let end = start + rect[start..].find('"')?;
                Some(rect[start..end].to_string())
            })
            .collect()
    }

    #[test]
    fn test_ten_day_scenario() {
        let cal = calendar(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let inactive: Rgb = "#ebedf0".parse().unwrap();

        for mode in [ColorMode::Levels(2), ColorMode::Continuous] {
            let grid = GridRenderer.render(&cal, &bw_options(mode));
            assert_eq!(grid.weeks.len(), 2);
            assert_eq!(grid.max_count, 9);
            assert_eq!(grid.weeks[0][0], Some(inactive));
            // Day 9 is the third day of the second week
            assert_eq!(grid.weeks[1][2], Some("#000000".parse().unwrap()));
            // Padding renders inactive
            assert_eq!(grid.weeks[1][6], Some(inactive));
        }
    }

    #[test]
    fn test_zero_count_is_always_inactive() {
        let cal = calendar(&[0, 5, 0, 100, 0]);
        let opts = bw_options(ColorMode::Continuous);
        let grid = GridRenderer.render(&cal, &opts);
        for (week, counts) in grid.weeks.iter().zip(&grid.contributions) {
            for (color, count) in week.iter().zip(counts) {
                if *count == Some(0) {
                    assert_eq!(*color, Some(opts.inactive_color));
                }
            }
        }
    }

    #[test]
    fn test_all_zero_svg_has_only_inactive_fills() {
        let cal = calendar(&[0; 20]);
        let opts = RenderOptions::default();
        let svg = SvgRenderer::default().render(&cal, &opts);

        let fills = rect_fills(&svg);
        assert_eq!(fills.len(), 21);
        let inactive = opts.inactive_color.to_string();
        assert!(fills.iter().all(|f| *f == inactive));
    }

    #[test]
    fn test_grid_colors_match_direct_interpolation() {
        let counts = [3, 0, 7, 1, 12, 5, 9, 2, 0, 4];
        let cal = calendar(&counts);
        let opts = bw_options(ColorMode::Continuous);
        let grid = GridRenderer.render(&cal, &opts);

        let json = serde_json::to_value(&grid).unwrap();
        let weeks: Vec<Vec<Option<String>>> =
            serde_json::from_value(json["weeks"].clone()).unwrap();
        let flat: Vec<Rgb> = weeks
            .into_iter()
            .flatten()
            .map(|c| c.unwrap().parse().unwrap())
            .collect();

        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let expected = interpolate(opts.start_color, opts.end_color, count as f64 / 12.0);
            assert_eq!(flat[i], expected, "day {i}");
        }
    }

    #[test]
    fn test_svg_geometry() {
        let cal = calendar(&[1; 14]);
        let opts = RenderOptions {
            box_size: 10.0,
            box_spacing: 2.0,
            ..RenderOptions::default()
        };
        let svg = SvgRenderer::default().render(&cal, &opts);
        assert!(svg.starts_with(r#"<svg width="24" height="104" viewBox="0 0 24 104""#));
        assert!(svg.ends_with("</svg>"));
        // Second week, last day
        assert!(svg.contains(r#"<rect x="12" y="92" width="10" height="10" rx="2" ry="2""#));

        let opts = RenderOptions {
            show_month_labels: false,
            ..opts
        };
        let svg = SvgRenderer::default().render(&cal, &opts);
        assert!(svg.starts_with(r#"<svg width="24" height="84""#));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_svg_tooltips() {
        let cal = calendar(&[0, 1, 2]);
        let svg = SvgRenderer::default().render(&cal, &RenderOptions::default());
        assert!(svg.contains("<title>Sunday, January 7, 2024\nNo contributions</title>"));
        assert!(svg.contains("<title>Monday, January 8, 2024\n1 contribution</title>"));
        assert!(svg.contains("<title>Tuesday, January 9, 2024\n2 contributions</title>"));
        // Padding has no date
        assert!(svg.contains("<title>No contributions</title>"));
    }

    #[test]
    fn test_svg_skips_unreadable_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let mut days: Vec<_> = (0..7)
            .map(|i| Some(ContributionDay::new(start + Duration::days(i), 1)))
            .collect();
        days[3] = None;
        let cal = reshape(days).unwrap();

        let svg = SvgRenderer::default().render(&cal, &RenderOptions::default());
        assert_eq!(rect_fills(&svg).len(), 6);
        // Geometry is unchanged: the fifth day keeps its row
        assert!(svg.contains(r#"y="68""#));
        assert!(!svg.contains(r#"y="56""#));
    }

    #[test]
    fn test_svg_quantized_levels() {
        let cal = calendar(&[1, 2, 4, 6, 8]);
        let opts = bw_options(ColorMode::Levels(4));
        let svg = SvgRenderer::default().render(&cal, &opts);
        let fills = rect_fills(&svg);
        // ramp: #ffffff #aaaaaa #555555 #000000
        assert_eq!(
            &fills[..5],
            &["#ffffff", "#aaaaaa", "#555555", "#000000", "#000000"]
        );
    }

    #[test]
    fn test_svg_month_labels_centered_over_span() {
        // Four weeks of January then two of February
        let cal = calendar(&[1; 42]);
        let svg = SvgRenderer::default().render(&cal, &RenderOptions::default());
        // Jan spans weeks 0..4: (4 * 12 - 30) / 2 = 9
        assert!(svg.contains(r##"<text x="9" y="15" font-family="Arial" font-size="12" fill="#24292f">Jan</text>"##));
        // Feb starts at week 4 and spans 2 weeks: 48 + (24 - 30) / 2 = 45
        assert!(svg.contains(r#"<text x="45" y="15""#));
    }

    #[test]
    fn test_weekday_labels_and_summary() {
        let cal = calendar(&[1; 7]);
        let opts = RenderOptions {
            show_weekday_labels: true,
            show_contribution_count: true,
            show_month_labels: false,
            ..RenderOptions::default()
        };
        let svg = SvgRenderer::default().render(&cal, &opts);
        assert!(svg.starts_with(r#"<svg width="42" height="104""#));
        assert!(svg.contains(">Sun</text>"));
        assert!(!svg.contains(">Mon</text>"));
        assert!(svg.contains(r#"<rect x="30" y="0""#));
        assert!(svg.contains(">7 contributions in the last year</text>"));

        let grid = GridRenderer.render(&cal, &opts);
        assert_eq!(
            grid.weekday_labels,
            Some(vec!["Sun", "", "Tue", "", "Thu", "", "Sat"])
        );
        assert_eq!(
            grid.summary.as_deref(),
            Some("7 contributions in the last year")
        );
    }

    #[test]
    fn test_grid_tooltips_and_labels() {
        let cal = calendar(&[1, 0]);
        let grid = GridRenderer.render(&cal, &RenderOptions::default());
        assert_eq!(
            grid.tooltips[0].as_deref(),
            Some("1 contribution on Sun Jan 07 2024")
        );
        assert_eq!(grid.tooltips[6].as_deref(), Some("No contributions"));
        assert_eq!(grid.month_labels.len(), 1);
        assert_eq!(grid.month_labels[0].x, 75.0);

        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["monthLabels"][0]["month"], "Jan");
        assert_eq!(json["monthLabels"][0]["weekIndex"], 0);
        assert!(json.get("weekdayLabels").is_none());
    }

    #[test]
    fn test_summary_thousands() {
        assert_eq!(summary_text(0), "0 contributions in the last year");
        assert_eq!(summary_text(999), "999 contributions in the last year");
        assert_eq!(summary_text(1234), "1,234 contributions in the last year");
        assert_eq!(
            summary_text(1234567),
            "1,234,567 contributions in the last year"
        );
    }

    #[test]
    fn test_empty_calendar() {
        let cal = ContributionCalendar::new(Vec::new(), 0);
        let svg = SvgRenderer::default().render(&cal, &RenderOptions::default());
        assert!(svg.starts_with(r#"<svg width="0" height="104""#));
        let grid = GridRenderer.render(&cal, &RenderOptions::default());
        assert_eq!(grid.max_count, 0);
        assert!(grid.weeks.is_empty());
    }
}
