//! Render options and the one place loosely typed input becomes them.
//!
//! Query strings and CLI `key=value` pairs both arrive as a
//! [`RenderQuery`] of optional strings. [`RenderOptions::from_query`]
//! applies defaults and coercion so the renderers only ever see typed,
//! validated values.

use serde::{Deserialize, Serialize};

use super::color::{ColorRamp, Rgb};
use super::error::{GridError, Result};

pub const DEFAULT_BOX_SIZE: f64 = 10.0;
pub const DEFAULT_BOX_SPACING: f64 = 2.0;
pub const DEFAULT_BORDER_RADIUS: f64 = 2.0;

/// Largest accepted box size, spacing or radius in pixels. Keeps the
/// canvas size finite for any number of weeks.
pub const MAX_DIMENSION: f64 = 1000.0;

/// Upper bound on the number of quantized activity levels
pub const MAX_LEVELS: usize = 16;

pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const DEFAULT_BORDER: Rgb = Rgb::new(0xeb, 0xed, 0xf0);
pub const DEFAULT_INACTIVE: Rgb = Rgb::new(0xeb, 0xed, 0xf0);
pub const DEFAULT_START: Rgb = Rgb::new(0x9b, 0xe9, 0xa8);
pub const DEFAULT_END: Rgb = Rgb::new(0x21, 0x6e, 0x39);
pub const DEFAULT_LABEL: Rgb = Rgb::new(0x24, 0x29, 0x2f);

/// Raw render parameters as they arrive from a query string
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQuery {
    pub box_size: Option<String>,
    pub box_spacing: Option<String>,
    pub border_radius: Option<String>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    #[serde(alias = "emptyColor")]
    pub inactive_color: Option<String>,
    #[serde(alias = "minActivityColor")]
    pub start_color: Option<String>,
    #[serde(alias = "maxActivityColor")]
    pub end_color: Option<String>,
    pub levels: Option<String>,
    #[serde(alias = "showLabels")]
    pub show_month_labels: Option<String>,
    pub show_weekday_labels: Option<String>,
    pub label_color: Option<String>,
    pub show_contribution_count: Option<String>,
}

/// How active days pick their color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
    Continuous,
    Levels(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub box_size: f64,
    pub box_spacing: f64,
    pub border_radius: f64,
    pub background_color: Rgb,
    pub border_color: Rgb,
    /// Used for every day with a zero count
    pub inactive_color: Rgb,
    pub start_color: Rgb,
    pub end_color: Rgb,
    /// `None` lets each renderer use its own default
    pub color_mode: Option<ColorMode>,
    pub show_month_labels: bool,
    pub show_weekday_labels: bool,
    pub label_color: Rgb,
    pub show_contribution_count: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            box_spacing: DEFAULT_BOX_SPACING,
            border_radius: DEFAULT_BORDER_RADIUS,
            background_color: DEFAULT_BACKGROUND,
            border_color: DEFAULT_BORDER,
            inactive_color: DEFAULT_INACTIVE,
            start_color: DEFAULT_START,
            end_color: DEFAULT_END,
            color_mode: None,
            show_month_labels: true,
            show_weekday_labels: false,
            label_color: DEFAULT_LABEL,
            show_contribution_count: false,
        }
    }
}

impl RenderOptions {
    /// Coerce raw parameters into options.
    ///
    /// Unusable numbers fall back to their defaults instead of failing,
    /// since they only affect geometry. Colors end up inside the
    /// rendered markup so anything that is not a hex color is rejected.
    pub fn from_query(query: &RenderQuery) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            box_size: coerce_number(
                query.box_size.as_deref(),
                DEFAULT_BOX_SIZE,
                |v| v > 0.0 && v <= MAX_DIMENSION,
            ),
            box_spacing: coerce_number(
                query.box_spacing.as_deref(),
                DEFAULT_BOX_SPACING,
                |v| (0.0..=MAX_DIMENSION).contains(&v),
            ),
            border_radius: coerce_number(
                query.border_radius.as_deref(),
                DEFAULT_BORDER_RADIUS,
                |v| (0.0..=MAX_DIMENSION).contains(&v),
            ),
            background_color: parse_color(
                "backgroundColor",
                query.background_color.as_deref(),
                defaults.background_color,
            )?,
            border_color: parse_color(
                "borderColor",
                query.border_color.as_deref(),
                defaults.border_color,
            )?,
            inactive_color: parse_color(
                "inactiveColor",
                query.inactive_color.as_deref(),
                defaults.inactive_color,
            )?,
            start_color: parse_color(
                "startColor",
                query.start_color.as_deref(),
                defaults.start_color,
            )?,
            end_color: parse_color("endColor", query.end_color.as_deref(), defaults.end_color)?,
            color_mode: parse_color_mode(query.levels.as_deref()),
            show_month_labels: coerce_bool(
                query.show_month_labels.as_deref(),
                defaults.show_month_labels,
            ),
            show_weekday_labels: coerce_bool(
                query.show_weekday_labels.as_deref(),
                defaults.show_weekday_labels,
            ),
            label_color: parse_color(
                "labelColor",
                query.label_color.as_deref(),
                defaults.label_color,
            )?,
            show_contribution_count: coerce_bool(
                query.show_contribution_count.as_deref(),
                defaults.show_contribution_count,
            ),
        })
    }

    /// Distance between the left edges of adjacent columns
    pub fn stride(&self) -> f64 {
        self.box_size + self.box_spacing
    }

    pub fn ramp(&self, default_mode: ColorMode) -> ColorRamp {
        match self.color_mode.unwrap_or(default_mode) {
            ColorMode::Continuous => ColorRamp::Continuous {
                low: self.start_color,
                high: self.end_color,
            },
            ColorMode::Levels(steps) => ColorRamp::levels(self.start_color, self.end_color, steps),
        }
    }
}

fn coerce_number(raw: Option<&str>, default: f64, accept: impl Fn(f64) -> bool) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && accept(v) => v,
        _ => {
            tracing::debug!("Ignoring unusable numeric option {:?}, using {}", raw, default);
            default
        }
    }
}

/// Anything other than `false` or `0` counts as true
fn coerce_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
    }
}

fn parse_color(field: &str, raw: Option<&str>, default: Rgb) -> Result<Rgb> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| GridError::InvalidInput(format!("{} is not a hex color: {:?}", field, v))),
    }
}

/// `0` or `continuous` selects interpolation, `1..=MAX_LEVELS` a
/// quantized ramp, anything else defers to the renderer.
fn parse_color_mode(raw: Option<&str>) -> Option<ColorMode> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case("continuous") {
        return Some(ColorMode::Continuous);
    }
    match raw.parse::<usize>() {
        Ok(0) => Some(ColorMode::Continuous),
        Ok(n) if n <= MAX_LEVELS => Some(ColorMode::Levels(n)),
        _ => {
            tracing::debug!("Ignoring unusable levels option {:?}", raw);
            None
        }
    }
}
