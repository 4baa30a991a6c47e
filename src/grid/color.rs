//! Hex colors, linear interpolation and quantized activity ramps

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::GridError;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap()
});

/// An RGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = GridError;

    /// Accepts `#rrggbb` or `rrggbb`, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HEX_COLOR_RE
            .captures(s.trim())
            .ok_or_else(|| GridError::InvalidInput(format!("not a hex color: {:?}", s)))?;

        let channel = |i: usize| {
            u8::from_str_radix(&caps[i], 16)
                .map_err(|e| GridError::InvalidInput(format!("bad channel in {:?}: {}", s, e)))
        };

        Ok(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Linearly interpolate each channel of `low` towards `high`.
///
/// `factor` is expected in `[0, 1]`; channels are rounded half away
/// from zero and clamped to a byte.
pub fn interpolate(low: Rgb, high: Rgb, factor: f64) -> Rgb {
    let mix = |a: u8, b: u8| {
        let a = a as f64;
        let b = b as f64;
        (a + (b - a) * factor).round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(mix(low.r, high.r), mix(low.g, high.g), mix(low.b, high.b))
}

/// Produce `steps` evenly spaced colors from `low` to `high` inclusive.
/// A single step is just `low`.
pub fn generate_ramp(low: Rgb, high: Rgb, steps: usize) -> Vec<Rgb> {
    match steps {
        0 => Vec::new(),
        1 => vec![low],
        _ => (0..steps)
            .map(|i| interpolate(low, high, i as f64 / (steps - 1) as f64))
            .collect(),
    }
}

/// Bucket a non-zero count into one of `steps` levels:
/// `min(steps - 1, floor(count / max_count * steps))`.
///
/// When `steps` does not evenly divide the range the top level is
/// reached before `count == max_count`.
pub fn activity_level(count: u64, max_count: u64, steps: usize) -> usize {
    if max_count == 0 || steps == 0 {
        return 0;
    }
    let ratio = count as f64 / max_count as f64;
    let level = (ratio * steps as f64).floor() as usize;
    level.min(steps - 1)
}

/// How active days are colored
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRamp {
    /// Interpolate between two colors by `count / max_count`
    Continuous { low: Rgb, high: Rgb },
    /// Pick one of a fixed set of colors by activity level
    Levels(Vec<Rgb>),
}

impl ColorRamp {
    pub fn levels(low: Rgb, high: Rgb, steps: usize) -> Self {
        Self::Levels(generate_ramp(low, high, steps.max(1)))
    }

    /// Color for an active day, `None` when the day should render inactive
    pub fn color_for(&self, count: u64, max_count: u64) -> Option<Rgb> {
        if count == 0 || max_count == 0 {
            return None;
        }

        match self {
            Self::Continuous { low, high } => {
                Some(interpolate(*low, *high, count as f64 / max_count as f64))
            }
            Self::Levels(colors) => {
                let level = activity_level(count, max_count, colors.len());
                colors.get(level).copied()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(s: &str) -> Rgb {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(rgb("#216e39"), Rgb::new(0x21, 0x6e, 0x39));
        assert_eq!(rgb("9BE9A8"), Rgb::new(0x9b, 0xe9, 0xa8));
        assert_eq!(Rgb::new(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "#fff", "#12345g", "red", "#1234567", "\"><script>"] {
            assert!(
                matches!(bad.parse::<Rgb>(), Err(GridError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_interpolate_endpoints() {
        let pairs = [
            ("#ebedf0", "#7e14eb"),
            ("#ffffff", "#000000"),
            ("#9be9a8", "#216e39"),
            ("#000000", "#000000"),
        ];
        for (a, b) in pairs {
            assert_eq!(interpolate(rgb(a), rgb(b), 0.0), rgb(a));
            assert_eq!(interpolate(rgb(a), rgb(b), 1.0), rgb(b));
        }
    }

    #[test]
    fn test_interpolate_midpoint_rounds_and_pads() {
        assert_eq!(
            interpolate(rgb("#000000"), rgb("#0a0a0a"), 0.5).to_string(),
            "#050505"
        );
        // 0 + 255 * 0.5 = 127.5 rounds up
        assert_eq!(
            interpolate(rgb("#000000"), rgb("#ffffff"), 0.5).to_string(),
            "#808080"
        );
    }

    #[test]
    fn test_generate_ramp_endpoints() {
        let (a, b) = (rgb("#9be9a8"), rgb("#216e39"));
        for steps in 2..10 {
            let ramp = generate_ramp(a, b, steps);
            assert_eq!(ramp.len(), steps);
            assert_eq!(ramp[0], a);
            assert_eq!(ramp[steps - 1], b);
        }
    }

    #[test]
    fn test_generate_ramp_single_step() {
        let (a, b) = (rgb("#9be9a8"), rgb("#216e39"));
        assert_eq!(generate_ramp(a, b, 1), vec![a]);
        assert!(generate_ramp(a, b, 0).is_empty());
    }

    #[test]
    fn test_activity_level_buckets() {
        assert_eq!(activity_level(1, 8, 4), 0);
        assert_eq!(activity_level(2, 8, 4), 1);
        assert_eq!(activity_level(4, 8, 4), 2);
        assert_eq!(activity_level(8, 8, 4), 3);
    }

    #[test]
    fn test_activity_level_reaches_top_before_max() {
        // floor(6 / 8 * 4) == 3, the top of a 4 step ramp
        assert_eq!(activity_level(6, 8, 4), 3);
        assert_eq!(activity_level(7, 8, 4), 3);
    }

    #[test]
    fn test_color_ramp_zero_is_inactive() {
        let continuous = ColorRamp::Continuous {
            low: rgb("#ffffff"),
            high: rgb("#000000"),
        };
        assert_eq!(continuous.color_for(0, 10), None);
        assert_eq!(continuous.color_for(0, 0), None);

        let levels = ColorRamp::levels(rgb("#ffffff"), rgb("#000000"), 4);
        assert_eq!(levels.color_for(0, 10), None);
        assert_eq!(levels.color_for(10, 10), Some(rgb("#000000")));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&rgb("#7e14eb")).unwrap();
        assert_eq!(json, r##""#7e14eb""##);
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rgb("#7e14eb"));
    }
}
