use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::grid::{
    ContributionCalendar, GridRenderer, RenderOptions, RenderQuery, Renderer, SvgRenderer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

/// Turn `key=value` pairs into render parameters, same names as the
/// HTTP query string
pub fn parse_render_query(pairs: &[String]) -> Result<RenderQuery> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got {:?}", pair))?;
        map.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

pub fn render_snapshot(
    calendar: &ContributionCalendar,
    format: OutputFormat,
    query: &RenderQuery,
) -> Result<String> {
    let options = RenderOptions::from_query(query)?;
    let output = match format {
        OutputFormat::Svg => SvgRenderer::default().render(calendar, &options),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&GridRenderer.render(calendar, &options))?
        }
    };
    Ok(output)
}

/// Render a saved snapshot to `out` or stdout
pub fn run(
    snapshot: &Path,
    format: OutputFormat,
    out: Option<&Path>,
    options: &[String],
) -> Result<()> {
    let raw = fs::read_to_string(snapshot)
        .with_context(|| format!("Failed to read snapshot {}", snapshot.display()))?;
    let calendar: ContributionCalendar = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid snapshot {}", snapshot.display()))?;
    let query = parse_render_query(options)?;

    let output = render_snapshot(&calendar, format, &query)?;

    match out {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Rendered {} to {}", snapshot.display(), path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}
